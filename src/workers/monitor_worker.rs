// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::domain::models::target::MonitorTarget;
use crate::domain::repositories::result_sink::ResultSink;
use crate::domain::services::monitor_service::MonitorService;
use crate::queue::admission::AdmissionError;
use crate::utils::errors::MonitorError;
use crate::workers::worker::{shutdown_requested, Worker};

/// 周期监控工作器
///
/// 每隔 `interval` 检查一次所有 `is_current` 的目标，并把结果交给输出端。
/// 目标列表来自 `watch` 通道，配置重载后下一轮即生效。
/// 单轮失败只记录日志，准入控制器关闭时工作器退出。
pub struct MonitorWorker {
    service: MonitorService,
    targets: watch::Receiver<Vec<MonitorTarget>>,
    sink: Arc<dyn ResultSink>,
    interval: Duration,
}

impl MonitorWorker {
    /// 使用固定目标列表创建工作器
    pub fn new(
        service: MonitorService,
        targets: Vec<MonitorTarget>,
        sink: Arc<dyn ResultSink>,
        interval: Duration,
    ) -> Self {
        let (_, receiver) = watch::channel(targets);
        Self::with_target_updates(service, receiver, sink, interval)
    }

    /// 从 `watch` 通道读取目标列表
    pub fn with_target_updates(
        service: MonitorService,
        targets: watch::Receiver<Vec<MonitorTarget>>,
        sink: Arc<dyn ResultSink>,
        interval: Duration,
    ) -> Self {
        Self {
            service,
            targets,
            sink,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// 当前需要检查的目标
    pub fn active_targets(&self) -> Vec<MonitorTarget> {
        self.targets
            .borrow()
            .iter()
            .filter(|target| target.is_current)
            .cloned()
            .collect()
    }

    /// 执行一轮检查，返回本轮完成检查的目标数
    ///
    /// 已完成的结果总会交给输出端；准入控制器在本轮中途关闭时，
    /// 先输出已完成的结果再返回 `AdmissionError::Closed`。
    pub async fn run_round(&self) -> Result<usize, MonitorError> {
        let targets = self.active_targets();
        if targets.is_empty() {
            return Ok(0);
        }

        let mut results = Vec::with_capacity(targets.len());
        let mut closed = false;
        for outcome in self.service.check_all(targets).await {
            match outcome {
                Ok(result) => results.push(result),
                Err(MonitorError::Admission(AdmissionError::Closed)) => closed = true,
                Err(e) => error!("Target check did not complete: {}", e),
            }
        }

        if !results.is_empty() {
            self.sink.record(&results).await?;
        }
        if closed {
            return Err(AdmissionError::Closed.into());
        }
        Ok(results.len())
    }
}

#[async_trait]
impl Worker for MonitorWorker {
    async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), MonitorError> {
        let target_count = self.targets.borrow().len();
        info!(
            targets = target_count,
            interval_ms = self.interval.as_millis() as u64,
            "Monitor worker started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_round().await {
                        Ok(checked) => info!(checked, "Monitoring round finished"),
                        Err(MonitorError::Admission(AdmissionError::Closed)) => {
                            info!("Admission controller closed, stopping monitor worker");
                            break;
                        }
                        Err(e) => error!("Monitoring round failed: {}", e),
                    }
                }
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        info!("Monitor worker stopped");
        Ok(())
    }

    fn name(&self) -> &str {
        "monitor"
    }
}
