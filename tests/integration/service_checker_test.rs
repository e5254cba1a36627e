// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::Ordering;
use std::time::Duration;

use probewatch::config::settings::MonitorSettings;
use probewatch::domain::models::probe_result::{CheckStatus, ErrorKind};
use probewatch::domain::models::target::MonitorTarget;
use probewatch::domain::services::service_checker::ServiceChecker;

use super::helpers::{closed_port, start_http_server, start_tcp_listener};

fn settings() -> MonitorSettings {
    MonitorSettings {
        http_timeout_secs: 2,
        tcp_timeout_secs: 2,
        retry_base_backoff_ms: 10,
        ..MonitorSettings::default()
    }
}

#[tokio::test]
async fn test_http_target_with_keyword() {
    let server = start_http_server().await;
    let checker = ServiceChecker::new(&settings());

    let result = checker
        .check_target(&MonitorTarget::new(server.url("/health")).with_keyword("ok"))
        .await;

    assert_eq!(result.status, CheckStatus::Success);
    assert_eq!(result.status_code, 200);
    assert!(result.keyword_matched);
    assert_eq!(result.error_kind, None);
    assert_eq!(result.ssl_cert_expiry, None);
}

#[tokio::test]
async fn test_second_check_within_ttl_is_served_from_cache() {
    let server = start_http_server().await;
    let checker = ServiceChecker::new(&settings());
    let target = MonitorTarget::new(server.url("/health"));

    let first = checker.check_target(&target).await;
    let second = checker.check_target(&target).await;

    assert_eq!(server.hits.health(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unavailable_with_matching_keyword_is_http_failure() {
    let server = start_http_server().await;
    let checker = ServiceChecker::new(&settings());

    let result = checker
        .check_target(&MonitorTarget::new(server.url("/unavailable")).with_keyword("ok"))
        .await;

    assert_eq!(result.status, CheckStatus::Failed);
    assert_eq!(result.error_kind, Some(ErrorKind::Http));
    assert_eq!(result.status_code, 503);
    assert!(result.keyword_matched);
    assert_eq!(server.hits.unavailable(), 3);
}

#[tokio::test]
async fn test_flaky_endpoint_recovers_on_retry() {
    let server = start_http_server().await;
    let checker = ServiceChecker::new(&settings());

    let result = checker
        .check_target(&MonitorTarget::new(server.url("/flaky")))
        .await;

    assert!(result.is_success());
    assert_eq!(result.status_code, 200);
    assert_eq!(server.hits.flaky(), 2);
}

#[tokio::test]
async fn test_missing_keyword_fails_after_all_attempts() {
    let server = start_http_server().await;
    let checker = ServiceChecker::new(&settings());

    let result = checker
        .check_target(&MonitorTarget::new(server.url("/health")).with_keyword("maintenance"))
        .await;

    assert_eq!(result.error_kind, Some(ErrorKind::Keyword));
    assert!(!result.keyword_matched);
    assert_eq!(server.hits.health(), 3);
    assert!(result.error_message.unwrap().contains("maintenance"));
}

#[tokio::test]
async fn test_tcp_target_reachable() {
    let (addr, accepted) = start_tcp_listener().await;
    let checker = ServiceChecker::new(&settings());

    let result = checker
        .check_target(&MonitorTarget::new(format!("tcp://{}", addr)))
        .await;

    assert!(result.is_success());
    assert_eq!(result.status_code, 0);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tcp_target_refused() {
    let addr = closed_port().await;
    let checker = ServiceChecker::new(&settings());

    let result = checker
        .check_target(&MonitorTarget::new(format!("tcp://{}", addr)))
        .await;

    assert_eq!(result.error_kind, Some(ErrorKind::Network));
    assert!(result.error_message.is_some());
}

#[tokio::test]
async fn test_tcp_target_without_port_is_invalid() {
    let checker = ServiceChecker::new(&MonitorSettings {
        max_retry: 1,
        ..settings()
    });

    let result = checker
        .check_target(&MonitorTarget::new("tcp://localhost"))
        .await;

    assert_eq!(result.status, CheckStatus::Failed);
    assert_eq!(result.error_kind, Some(ErrorKind::Invalid));
}

#[tokio::test]
async fn test_serialized_result_shape() {
    let server = start_http_server().await;
    let checker = ServiceChecker::new(&settings());

    let result = checker
        .check_target(&MonitorTarget::new(server.url("/unavailable")))
        .await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["targetUrl"], server.url("/unavailable"));
    assert_eq!(json["status"], "failed");
    assert_eq!(json["statusCode"], 503);
    assert_eq!(json["errorType"], "http");
    assert!(json["checkedAt"].is_string());
}
