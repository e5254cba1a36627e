// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

use crate::config::settings::MonitorSettings;

/// 重试策略配置
///
/// 第 `i` 次尝试（从 0 开始）失败后，在下一次尝试之前等待
/// `initial_backoff * 2^i`，并且不超过 `max_backoff`。
/// 第一次尝试之前以及最后一次尝试之后都不等待。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（至少为 1）
    pub max_attempts: u32,
    /// 初始退避时间
    pub initial_backoff: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// 根据监控配置创建重试策略
    pub fn from_settings(settings: &MonitorSettings) -> Self {
        Self {
            max_attempts: settings.max_retry.max(1),
            initial_backoff: settings.retry_base_backoff(),
            max_backoff: settings.max_backoff(),
        }
    }

    /// 计算第 `attempt` 次尝试失败后的退避时间
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// 第 `attempt` 次尝试失败后是否还有下一次尝试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) < self.max_attempts.max(1)
    }

    /// 总尝试次数
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// 完整的退避序列，长度为 `attempts() - 1`
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.attempts() - 1)
            .map(|attempt| self.calculate_backoff(attempt))
            .collect()
    }
}
