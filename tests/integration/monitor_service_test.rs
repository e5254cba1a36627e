// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use probewatch::config::settings::MonitorSettings;
use probewatch::domain::models::probe_result::{ErrorKind, MonitorResult, ProbeObservation};
use probewatch::domain::models::target::{MonitorTarget, TaskPriority};
use probewatch::domain::services::monitor_service::MonitorService;
use probewatch::domain::services::service_checker::ServiceChecker;
use probewatch::engines::traits::{ProbeAttempt, Prober};
use probewatch::infrastructure::cache::result_cache::ResultCache;
use probewatch::queue::admission::AdmissionController;
use probewatch::utils::retry_policy::RetryPolicy;

use super::helpers::{closed_port, start_http_server, start_tcp_listener};

/// 记录探测顺序的引擎
#[derive(Default)]
struct RecordingProber {
    order: Mutex<Vec<String>>,
}

#[async_trait]
impl Prober for RecordingProber {
    async fn probe(&self, target: &MonitorTarget) -> ProbeAttempt {
        self.order.lock().push(target.url.clone());
        ProbeAttempt::succeeded(ProbeObservation::default())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[tokio::test]
async fn test_waiting_targets_are_admitted_by_priority() {
    let prober = Arc::new(RecordingProber::default());
    let checker = ServiceChecker::with_components(
        prober.clone(),
        prober.clone(),
        Arc::new(ResultCache::new(Duration::from_secs(30))),
        RetryPolicy::default(),
    );
    let service = MonitorService::new(Arc::new(checker), AdmissionController::new(1));

    // 先占住唯一的槽位，让所有目标都进入等待队列
    let holder = service.admission().acquire().await.unwrap();

    let targets = vec![
        MonitorTarget::new("tcp://low-1:1").with_priority(TaskPriority::Low),
        MonitorTarget::new("tcp://normal:1"),
        MonitorTarget::new("tcp://high:1").with_priority(TaskPriority::High),
        MonitorTarget::new("tcp://low-2:1").with_priority(TaskPriority::Low),
    ];
    let expected_urls: Vec<String> = targets.iter().map(|t| t.url.clone()).collect();

    let batch = {
        let service = service.clone();
        tokio::spawn(async move { service.check_all(targets).await })
    };
    while service.admission().waiting() < 4 {
        tokio::task::yield_now().await;
    }
    holder.release();

    let results: Vec<MonitorResult> = batch
        .await
        .unwrap()
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    let returned: Vec<String> = results.iter().map(|r| r.target_url.clone()).collect();
    assert_eq!(returned, expected_urls);

    let high_first = prober.order.lock().clone();
    assert_eq!(high_first[0], "tcp://high:1");
    assert_eq!(high_first[1], "tcp://normal:1");
    // 同优先级按入队顺序，而入队顺序取决于任务调度，这里只检查集合
    let mut lows = high_first[2..].to_vec();
    lows.sort();
    assert_eq!(lows, vec!["tcp://low-1:1", "tcp://low-2:1"]);
}

#[tokio::test]
async fn test_mixed_batch_against_real_endpoints() {
    let server = start_http_server().await;
    let (open, _) = start_tcp_listener().await;
    let closed = closed_port().await;

    let settings = MonitorSettings {
        concurrency: 2,
        max_retry: 1,
        http_timeout_secs: 2,
        tcp_timeout_secs: 2,
        ..MonitorSettings::default()
    };
    let service = MonitorService::new(
        Arc::new(ServiceChecker::new(&settings)),
        AdmissionController::new(settings.concurrency),
    );

    let results = service
        .check_all(vec![
            MonitorTarget::new(server.url("/health")).with_keyword("ok"),
            MonitorTarget::new(format!("tcp://{}", open)),
            MonitorTarget::new(format!("tcp://{}", closed)),
            MonitorTarget::new(server.url("/unavailable")),
        ])
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let kinds: Vec<Option<ErrorKind>> = results.iter().map(|r| r.error_kind).collect();
    assert_eq!(
        kinds,
        vec![None, None, Some(ErrorKind::Network), Some(ErrorKind::Http)]
    );
    assert_eq!(service.admission().in_use(), 0);
}
