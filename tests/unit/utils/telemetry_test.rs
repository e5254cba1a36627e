// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use probewatch::config::settings::LoggingSettings;
    use probewatch::utils::telemetry;

    #[test]
    fn test_telemetry_initialization_is_idempotent() {
        telemetry::init_telemetry(&LoggingSettings::default());
        // 第二次初始化只会记录一条调试日志
        telemetry::init_telemetry(&LoggingSettings {
            level: "debug".to_string(),
            json: true,
        });

        tracing::info!(
            url = "https://example.com",
            attempt = 1,
            kind = "timeout",
            "Probe attempt failed, retrying"
        );
    }

    #[test]
    fn test_describe_metrics_without_recorder() {
        // 未安装 recorder 时描述指标不会失败，可重复调用
        telemetry::describe_metrics();
        telemetry::describe_metrics();
        metrics::counter!("probe_attempts_total", "protocol" => "tcp").increment(1);
    }
}
