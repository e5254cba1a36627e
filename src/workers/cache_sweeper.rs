// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::domain::services::service_checker::ServiceChecker;
use crate::utils::errors::MonitorError;
use crate::workers::worker::{shutdown_requested, Worker};

/// 缓存过期清理工作器
///
/// 按缓存有效期定期清理过期的检查结果
pub struct CacheSweeper {
    checker: Arc<ServiceChecker>,
    interval: Duration,
}

impl CacheSweeper {
    /// 清理间隔等于缓存有效期
    pub fn new(checker: Arc<ServiceChecker>) -> Self {
        let interval = checker.cache().ttl();
        Self::with_interval(checker, interval)
    }

    pub fn with_interval(checker: Arc<ServiceChecker>, interval: Duration) -> Self {
        Self {
            checker,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 执行一次清理
    pub fn sweep(&self) -> usize {
        self.checker.clean_expired_cache()
    }
}

#[async_trait]
impl Worker for CacheSweeper {
    async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), MonitorError> {
        info!(interval_ms = self.interval.as_millis() as u64, "Cache sweeper started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 第一次 tick 立即完成，此时缓存不可能有过期条目
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = self.sweep();
                    if removed > 0 {
                        info!("Cleaned up {} expired cache entries", removed);
                    }
                }
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        info!("Cache sweeper stopped");
        Ok(())
    }

    fn name(&self) -> &str {
        "cache_sweeper"
    }
}

#[cfg(test)]
#[path = "cache_sweeper_test.rs"]
mod tests;
