// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::utils::errors::MonitorError;

/// Worker trait定义
///
/// 所有后台工作器都必须实现此trait。
/// `shutdown` 的值变为 `true`（或发送端被丢弃）时应尽快返回。
#[async_trait]
pub trait Worker: Send + Sync {
    /// 运行工作器直到收到关闭信号
    async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<(), MonitorError>;

    /// 获取工作器名称
    fn name(&self) -> &str;
}

/// 等待关闭信号
///
/// 发送端被丢弃也视为关闭
pub(crate) async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
