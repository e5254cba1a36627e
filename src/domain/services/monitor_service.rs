// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::domain::models::probe_result::MonitorResult;
use crate::domain::models::target::MonitorTarget;
use crate::domain::services::service_checker::ServiceChecker;
use crate::queue::admission::{AdmissionController, AdmissionError};
use crate::queue::priority_queue::PriorityTask;
use crate::utils::errors::MonitorError;

/// 监控服务
///
/// 把准入控制和服务检查组合起来：每个目标先按优先级获取许可，
/// 检查完成后归还许可。
#[derive(Clone)]
pub struct MonitorService {
    checker: Arc<ServiceChecker>,
    admission: AdmissionController,
}

impl MonitorService {
    pub fn new(checker: Arc<ServiceChecker>, admission: AdmissionController) -> Self {
        Self { checker, admission }
    }

    pub fn checker(&self) -> &Arc<ServiceChecker> {
        &self.checker
    }

    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// 在许可保护下检查单个目标
    pub async fn check_one(&self, target: MonitorTarget) -> Result<MonitorResult, MonitorError> {
        run_admitted(self.checker.clone(), self.admission.clone(), target)
            .await
            .map_err(MonitorError::from)
    }

    /// 批量检查
    ///
    /// 每个目标一个任务并发执行，返回与输入一一对应的结果。
    /// 单个目标取不到许可（控制器已关闭）或任务异常终止时，只影响该目标，
    /// 已完成的检查结果照常返回。
    ///
    /// # 参数
    ///
    /// * `targets` - 待检查的目标列表
    ///
    /// # 返回值
    ///
    /// 与输入顺序一致的每个目标的结果
    pub async fn check_all(
        &self,
        targets: Vec<MonitorTarget>,
    ) -> Vec<Result<MonitorResult, MonitorError>> {
        let total = targets.len();
        let handles: Vec<_> = targets
            .into_iter()
            .map(|target| {
                tokio::spawn(run_admitted(
                    self.checker.clone(),
                    self.admission.clone(),
                    target,
                ))
            })
            .collect();

        let outcomes: Vec<Result<MonitorResult, MonitorError>> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(outcome) => outcome.map_err(MonitorError::from),
                Err(e) => Err(MonitorError::from(e)),
            })
            .collect();

        let completed = outcomes.iter().filter(|o| o.is_ok()).count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(r) if !r.is_success()))
            .count();
        if completed < total {
            warn!(
                targets = total,
                completed,
                failed,
                "Batch check finished with unchecked targets"
            );
        } else {
            info!(targets = total, failed, "Batch check finished");
        }
        outcomes
    }
}

async fn run_admitted(
    checker: Arc<ServiceChecker>,
    admission: AdmissionController,
    target: MonitorTarget,
) -> Result<MonitorResult, AdmissionError> {
    let permit = admission
        .acquire_with_priority(PriorityTask::new(target.clone()))
        .await?;
    let result = checker.check_target(&target).await;
    permit.release();
    Ok(result)
}
