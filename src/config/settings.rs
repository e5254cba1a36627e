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

use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含监控、日志以及静态监控目标列表
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 监控配置
    pub monitor: MonitorSettings,
    /// 日志配置
    pub logging: LoggingSettings,
    /// 监控目标
    #[serde(default)]
    pub targets: Vec<TargetSettings>,
}

/// 监控配置设置
///
/// 核心只读取这些值，从不修改
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorSettings {
    /// 最大并发检查数
    pub concurrency: usize,
    /// 周期检查间隔（秒）
    pub check_interval_secs: u64,
    /// HTTP 请求超时时间（秒）
    pub http_timeout_secs: u64,
    /// TCP 连接超时时间（秒）
    pub tcp_timeout_secs: u64,
    /// 最大尝试次数
    pub max_retry: u32,
    /// 响应体最大读取字节数
    pub max_body_size: u64,
    /// 结果缓存有效期（秒）
    pub cache_ttl_secs: u64,
    /// 初始退避时间（毫秒）
    pub retry_base_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
    /// HTTP 探测使用的 User-Agent
    pub user_agent: String,
    /// 配置重新加载间隔（秒），0 表示不重新加载
    pub config_reload_secs: u64,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 日志级别，EnvFilter 语法
    pub level: String,
    /// 是否输出 JSON 格式
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,probewatch=debug".to_string(),
            json: false,
        }
    }
}

/// 静态监控目标配置
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSettings {
    pub url: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default = "default_is_current")]
    pub is_current: bool,
}

fn default_is_current() -> bool {
    true
}

impl MonitorSettings {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn tcp_timeout(&self) -> Duration {
        Duration::from_secs(self.tcp_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_base_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_base_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// 配置重新加载间隔，未启用时为 `None`
    pub fn config_reload_interval(&self) -> Option<Duration> {
        (self.config_reload_secs > 0).then(|| Duration::from_secs(self.config_reload_secs))
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            concurrency: 5,
            check_interval_secs: 5,
            http_timeout_secs: 10,
            tcp_timeout_secs: 5,
            max_retry: 3,
            max_body_size: 1024 * 1024,
            cache_ttl_secs: 30,
            retry_base_backoff_ms: 100,
            max_backoff_ms: 10_000,
            user_agent: "ServiceMonitor/1.0 (+https://github.com/example/servicemonitor)"
                .to_string(),
            config_reload_secs: 30,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `PROBEWATCH__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并校验的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PROBEWATCH").separator("__"));

        Self::finish(builder)
    }

    /// 从指定文件加载配置（不读取环境变量）
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(File::from(path.as_ref()).required(true));
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let monitor = MonitorSettings::default();
        let logging = LoggingSettings::default();

        Config::builder()
            .set_default("monitor.concurrency", monitor.concurrency as u64)?
            .set_default("monitor.check_interval_secs", monitor.check_interval_secs)?
            .set_default("monitor.http_timeout_secs", monitor.http_timeout_secs)?
            .set_default("monitor.tcp_timeout_secs", monitor.tcp_timeout_secs)?
            .set_default("monitor.max_retry", monitor.max_retry as u64)?
            .set_default("monitor.max_body_size", monitor.max_body_size)?
            .set_default("monitor.cache_ttl_secs", monitor.cache_ttl_secs)?
            .set_default("monitor.retry_base_backoff_ms", monitor.retry_base_backoff_ms)?
            .set_default("monitor.max_backoff_ms", monitor.max_backoff_ms)?
            .set_default("monitor.user_agent", monitor.user_agent)?
            .set_default("monitor.config_reload_secs", monitor.config_reload_secs)?
            .set_default("logging.level", logging.level)?
            .set_default("logging.json", logging.json)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        let monitor = &self.monitor;
        if monitor.concurrency == 0 {
            return Err(ConfigError::Message(
                "monitor.concurrency must be at least 1".to_string(),
            ));
        }
        if monitor.max_retry == 0 {
            return Err(ConfigError::Message(
                "monitor.max_retry must be at least 1".to_string(),
            ));
        }
        if monitor.max_body_size == 0 {
            return Err(ConfigError::Message(
                "monitor.max_body_size must be at least 1".to_string(),
            ));
        }
        if monitor.cache_ttl_secs == 0 {
            return Err(ConfigError::Message(
                "monitor.cache_ttl_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
