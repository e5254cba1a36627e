// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器管理器测试模块
///
/// 用真实的检查器和工作器验证启动与统一关闭

#[cfg(test)]
mod tests {
    use probewatch::config::settings::MonitorSettings;
    use probewatch::domain::models::target::MonitorTarget;
    use probewatch::domain::services::monitor_service::MonitorService;
    use probewatch::domain::services::service_checker::ServiceChecker;
    use probewatch::infrastructure::repositories::result_sink_impl::MemoryResultSink;
    use probewatch::queue::admission::AdmissionController;
    use probewatch::workers::cache_sweeper::CacheSweeper;
    use probewatch::workers::manager::WorkerManager;
    use probewatch::workers::monitor_worker::MonitorWorker;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_worker_manager_runs_and_stops_workers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                drop(socket);
            }
        });

        let settings = MonitorSettings {
            check_interval_secs: 1,
            ..MonitorSettings::default()
        };
        let checker = Arc::new(ServiceChecker::new(&settings));
        let admission = AdmissionController::new(settings.concurrency);
        let service = MonitorService::new(checker.clone(), admission.clone());
        let sink = Arc::new(MemoryResultSink::new());

        let mut manager = WorkerManager::new();
        manager.spawn(Arc::new(CacheSweeper::new(checker.clone())));
        manager.spawn(Arc::new(MonitorWorker::new(
            service,
            vec![MonitorTarget::new(format!("tcp://{}", addr))],
            sink.clone(),
            settings.check_interval(),
        )));
        assert_eq!(manager.len(), 2);

        // 第一轮在启动后立即执行
        for _ in 0..100 {
            if sink.round_count() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        admission.close();
        manager.shutdown().await;

        let rounds = sink.rounds();
        assert!(!rounds.is_empty());
        assert!(rounds[0][0].is_success());
        assert_eq!(checker.cache().len(), 1);
    }
}
