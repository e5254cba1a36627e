// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use config::ConfigError;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::config::settings::{MonitorSettings, Settings};
use crate::domain::models::target::MonitorTarget;
use crate::utils::errors::MonitorError;
use crate::workers::worker::{shutdown_requested, Worker};

/// 配置加载函数
pub type SettingsLoader = Arc<dyn Fn() -> Result<Settings, ConfigError> + Send + Sync>;

/// 配置重新加载工作器
///
/// 定期重新读取配置，把新的目标列表发布到 `watch` 通道。
/// 加载失败时保留当前目标；`monitor` 段的变化需要重启才能生效，只记录告警。
pub struct ConfigReloader {
    loader: SettingsLoader,
    interval: Duration,
    targets: watch::Sender<Vec<MonitorTarget>>,
    last_monitor: Mutex<MonitorSettings>,
}

impl ConfigReloader {
    pub fn new(
        loader: SettingsLoader,
        current: &Settings,
        targets: watch::Sender<Vec<MonitorTarget>>,
        interval: Duration,
    ) -> Self {
        Self {
            loader,
            interval: interval.max(Duration::from_millis(1)),
            targets,
            last_monitor: Mutex::new(current.monitor.clone()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 重新加载一次配置
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 目标列表发生变化并已发布
    /// * `Ok(false)` - 目标列表未变化
    /// * `Err(ConfigError)` - 配置读取或校验失败
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let settings = (self.loader)()?;

        {
            let mut last = self.last_monitor.lock();
            if *last != settings.monitor {
                warn!("Monitor settings changed, restart to apply them");
                *last = settings.monitor.clone();
            }
        }

        let targets: Vec<MonitorTarget> = settings
            .targets
            .into_iter()
            .map(MonitorTarget::from)
            .collect();
        let count = targets.len();
        let changed = self.targets.send_if_modified(|current| {
            if *current == targets {
                return false;
            }
            *current = targets;
            true
        });

        if changed {
            info!(targets = count, "Monitor targets reloaded");
        }
        Ok(changed)
    }
}

#[async_trait]
impl Worker for ConfigReloader {
    async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), MonitorError> {
        info!(interval_ms = self.interval.as_millis() as u64, "Config reloader started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 启动时的配置已经加载过
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.reload() {
                        warn!(error = %e, "Config reload failed, keeping current targets");
                    }
                }
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        info!("Config reloader stopped");
        Ok(())
    }

    fn name(&self) -> &str {
        "config_reloader"
    }
}

#[cfg(test)]
#[path = "config_reloader_test.rs"]
mod tests;
