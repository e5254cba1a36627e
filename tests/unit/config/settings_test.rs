// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试从 `config/default.toml` 和环境变量加载配置

#[cfg(test)]
mod tests {
    use probewatch::config::settings::{MonitorSettings, Settings};
    use std::time::Duration;

    // 环境变量是进程级共享状态，相关断言放在同一个测试里顺序执行
    #[test]
    fn test_config_loading_and_env_override() {
        let settings = Settings::new().expect("default configuration should load");
        let defaults = MonitorSettings::default();

        assert_eq!(settings.monitor.concurrency, defaults.concurrency);
        assert_eq!(settings.monitor.max_retry, 3);
        assert_eq!(settings.monitor.http_timeout(), Duration::from_secs(10));
        assert_eq!(settings.monitor.cache_ttl(), Duration::from_secs(30));
        assert!(settings.targets.is_empty());

        std::env::set_var("PROBEWATCH__MONITOR__CONCURRENCY", "9");
        std::env::set_var("PROBEWATCH__MONITOR__MAX_RETRY", "5");
        let overridden = Settings::new();
        std::env::remove_var("PROBEWATCH__MONITOR__CONCURRENCY");
        std::env::remove_var("PROBEWATCH__MONITOR__MAX_RETRY");

        let overridden = overridden.expect("env overrides should load");
        assert_eq!(overridden.monitor.concurrency, 9);
        assert_eq!(overridden.monitor.max_retry, 5);

        std::env::set_var("PROBEWATCH__MONITOR__CACHE_TTL_SECS", "0");
        let rejected = Settings::new();
        std::env::remove_var("PROBEWATCH__MONITOR__CACHE_TTL_SECS");
        assert!(rejected.is_err());
    }
}
