// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::settings::LoggingSettings;

/// 初始化日志系统
///
/// `RUST_LOG` 优先，其次使用配置中的级别。重复调用是安全的。
pub fn init_telemetry(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| "info,probewatch=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    let result = if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Telemetry already initialized: {}", e);
    }
}

/// 注册探测相关指标的描述
///
/// 只描述指标，不安装导出器；未安装 recorder 时为空操作
pub fn describe_metrics() {
    describe_counter!(
        "probe_attempts_total",
        "Total number of probe attempts, labelled by protocol"
    );
    describe_counter!(
        "probe_results_total",
        "Total number of finished checks, labelled by status and error kind"
    );
    describe_counter!(
        "probe_cache_hits_total",
        "Total number of checks answered from the result cache"
    );
    describe_histogram!(
        "probe_duration_seconds",
        "Duration of single probe attempts in seconds"
    );
    describe_gauge!(
        "admission_waiters",
        "Number of checks waiting for an admission slot"
    );
}
