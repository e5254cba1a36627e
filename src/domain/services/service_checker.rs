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

use metrics::{counter, histogram};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::settings::MonitorSettings;
use crate::domain::models::probe_result::MonitorResult;
use crate::domain::models::target::MonitorTarget;
use crate::engines::http_engine::HttpProber;
use crate::engines::tcp_engine::TcpProber;
use crate::engines::traits::Prober;
use crate::infrastructure::cache::result_cache::ResultCache;
use crate::utils::retry_policy::RetryPolicy;

/// 服务检查器
///
/// 负责单个目标的完整检查流程：查询缓存、按协议选择探测引擎、
/// 失败后指数退避重试、写回缓存。
///
/// 检查器本身不做并发控制，调用方应先从 `AdmissionController`
/// 获取许可。退避等待期间许可一直被占用。
pub struct ServiceChecker {
    /// TCP 探测引擎
    tcp: Arc<dyn Prober>,
    /// HTTP(S) 探测引擎
    http: Arc<dyn Prober>,
    /// 结果缓存
    cache: Arc<ResultCache>,
    /// 重试策略
    retry_policy: RetryPolicy,
}

impl ServiceChecker {
    /// 根据监控配置创建检查器
    ///
    /// # 参数
    ///
    /// * `settings` - 监控配置，只读
    ///
    /// # 返回值
    ///
    /// 使用内置 TCP/HTTP 探测引擎和系统时钟缓存的检查器
    pub fn new(settings: &MonitorSettings) -> Self {
        Self::with_components(
            Arc::new(TcpProber::new(settings.tcp_timeout())),
            Arc::new(HttpProber::from_settings(settings)),
            Arc::new(ResultCache::new(settings.cache_ttl())),
            RetryPolicy::from_settings(settings),
        )
    }

    /// 使用自定义组件创建检查器
    pub fn with_components(
        tcp: Arc<dyn Prober>,
        http: Arc<dyn Prober>,
        cache: Arc<ResultCache>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            tcp,
            http,
            cache,
            retry_policy,
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    fn prober_for(&self, target: &MonitorTarget) -> &dyn Prober {
        if target.is_tcp() {
            self.tcp.as_ref()
        } else {
            self.http.as_ref()
        }
    }

    /// 检查单个目标
    ///
    /// 缓存命中时直接返回缓存的结果，不做任何探测。
    /// 否则最多尝试 `retry_policy.attempts()` 次，成功即停止；
    /// 最终结果在返回前写入缓存。
    ///
    /// # 参数
    ///
    /// * `target` - 监控目标
    ///
    /// # 返回值
    ///
    /// 完整的检查结果，失败时带有错误信息和错误分类
    pub async fn check_target(&self, target: &MonitorTarget) -> MonitorResult {
        if let Some(cached) = self.cache.get(&target.url) {
            counter!("probe_cache_hits_total").increment(1);
            debug!(url = %target.url, "Returning cached result");
            return cached;
        }

        let checked_at = self.cache.clock().now();
        let prober = self.prober_for(target);
        let mut attempt: u32 = 0;

        let result = loop {
            counter!("probe_attempts_total", "protocol" => prober.name()).increment(1);

            let started = Instant::now();
            let probe = prober.probe(target).await;
            let elapsed = started.elapsed();
            histogram!("probe_duration_seconds", "protocol" => prober.name())
                .record(elapsed.as_secs_f64());
            let response_time_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

            match probe.outcome {
                Ok(()) => {
                    debug!(
                        url = %target.url,
                        attempt = attempt + 1,
                        response_time_ms,
                        "Probe succeeded"
                    );
                    break MonitorResult::success(
                        target.url.clone(),
                        checked_at,
                        response_time_ms,
                        probe.observation,
                    );
                }
                Err(error) if self.retry_policy.should_retry(attempt) => {
                    let backoff = self.retry_policy.calculate_backoff(attempt);
                    debug!(
                        url = %target.url,
                        attempt = attempt + 1,
                        kind = %error.kind(),
                        backoff_ms = backoff.as_millis() as u64,
                        error = %error,
                        "Probe attempt failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(error) => {
                    warn!(
                        url = %target.url,
                        attempts = attempt + 1,
                        kind = %error.kind(),
                        error = %error,
                        "Probe failed"
                    );
                    break MonitorResult::failed(
                        target.url.clone(),
                        checked_at,
                        response_time_ms,
                        probe.observation,
                        error.kind(),
                        error.to_string(),
                    );
                }
            }
        };

        counter!(
            "probe_results_total",
            "status" => result.status.as_str(),
            "kind" => result.error_kind.map(|kind| kind.as_str()).unwrap_or("none")
        )
        .increment(1);

        self.cache.insert(result.clone());
        result
    }

    /// 清理所有过期的缓存条目，返回清理数量
    pub fn clean_expired_cache(&self) -> usize {
        self.cache.purge_expired()
    }
}

#[cfg(test)]
#[path = "service_checker_test.rs"]
mod tests;
