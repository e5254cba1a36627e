// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::utils::errors::MonitorError;
use crate::workers::worker::Worker;

/// 工作管理器
///
/// 统一启动后台工作器，并通过同一个关闭信号停止它们
pub struct WorkerManager {
    shutdown: watch::Sender<bool>,
    handles: Vec<(String, JoinHandle<Result<(), MonitorError>>)>,
}

impl WorkerManager {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            handles: Vec::new(),
        }
    }

    /// 启动一个工作器
    pub fn spawn(&mut self, worker: Arc<dyn Worker>) {
        let name = worker.name().to_string();
        let shutdown = self.shutdown.subscribe();
        info!(worker = %name, "Starting worker");
        let handle = tokio::spawn(async move { worker.run(shutdown).await });
        self.handles.push((name, handle));
    }

    /// 正在管理的工作器数量
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// 发送关闭信号并等待所有工作器退出
    pub async fn shutdown(self) {
        info!("Shutting down workers...");
        self.shutdown.send_replace(true);

        for (name, handle) in self.handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(worker = %name, "Worker failed: {}", e),
                Err(e) => error!(worker = %name, "Worker panicked: {}", MonitorError::from(e)),
            }
        }

        info!("Workers shut down successfully");
    }
}

impl Default for WorkerManager {
    fn default() -> Self {
        Self::new()
    }
}
