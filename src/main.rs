// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use probewatch::config::settings::Settings;
use probewatch::domain::models::target::MonitorTarget;
use probewatch::domain::services::monitor_service::MonitorService;
use probewatch::domain::services::service_checker::ServiceChecker;
use probewatch::infrastructure::repositories::result_sink_impl::LogResultSink;
use probewatch::queue::admission::AdmissionController;
use probewatch::utils::telemetry;
use probewatch::workers::cache_sweeper::CacheSweeper;
use probewatch::workers::config_reloader::{ConfigReloader, SettingsLoader};
use probewatch::workers::manager::WorkerManager;
use probewatch::workers::monitor_worker::MonitorWorker;
use tokio::sync::watch;
use tracing::{info, warn};

/// 主函数
///
/// 加载配置、组装检查器和后台工作器，运行到收到 Ctrl-C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new()?;

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging);
    telemetry::describe_metrics();
    info!("Starting probewatch...");

    let targets: Vec<MonitorTarget> = settings
        .targets
        .iter()
        .cloned()
        .map(MonitorTarget::from)
        .collect();
    if targets.is_empty() {
        warn!("No targets configured");
    }
    info!(
        targets = targets.len(),
        concurrency = settings.monitor.concurrency,
        "Configuration loaded"
    );

    // 3. Core components
    let checker = Arc::new(ServiceChecker::new(&settings.monitor));
    let admission = AdmissionController::new(settings.monitor.concurrency);
    let service = MonitorService::new(checker.clone(), admission.clone());

    // 4. Background workers
    let mut manager = WorkerManager::new();
    manager.spawn(Arc::new(CacheSweeper::new(checker)));
    let (targets_tx, targets_rx) = watch::channel(targets);
    manager.spawn(Arc::new(MonitorWorker::with_target_updates(
        service,
        targets_rx,
        Arc::new(LogResultSink),
        settings.monitor.check_interval(),
    )));
    if let Some(interval) = settings.monitor.config_reload_interval() {
        let loader: SettingsLoader = Arc::new(Settings::new);
        manager.spawn(Arc::new(ConfigReloader::new(
            loader,
            &settings,
            targets_tx,
            interval,
        )));
    }

    // 5. Run until Ctrl-C
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Unable to listen for shutdown signal: {}", e),
    }

    // 先关闭准入控制，正在等待的检查立即失败
    admission.close();
    manager.shutdown().await;
    info!("probewatch stopped");
    Ok(())
}
