// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use crate::domain::models::probe_result::MonitorResult;
use crate::utils::errors::MonitorError;

/// 检查结果输出特质
///
/// 周期监控每一轮的结果都交给它，具体存储方式由基础设施层决定
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 记录一轮检查结果
    async fn record(&self, results: &[MonitorResult]) -> Result<(), MonitorError>;
}
