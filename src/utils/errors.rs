// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::queue::admission::AdmissionError;

/// 监控编排层错误类型
///
/// 单个探测的失败不会走到这里，它们总是被折叠进 `MonitorResult`。
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    #[error("准入控制错误: {0}")]
    Admission(#[from] AdmissionError),

    #[error("检查任务异常终止: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("结果输出失败: {0}")]
    Sink(String),
}
