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

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::header::{HeaderValue, CONNECTION};
use reqwest::tls::{TlsInfo, Version};
use tracing::{debug, warn};

use crate::config::settings::MonitorSettings;
use crate::domain::models::probe_result::ProbeObservation;
use crate::domain::models::target::MonitorTarget;
use crate::engines::tls_inspector::CertificateExpiry;
use crate::engines::traits::{ProbeAttempt, ProbeError, Prober};
use crate::utils::clock::{Clock, SystemClock};

/// HTTP(S) 探测引擎
///
/// 对目标发起一次 GET 请求，按以下顺序判定：
/// 传输错误 → 读取响应体错误 → 非 2xx 状态码 → 关键词缺失。
/// HTTPS 目标会额外记录对端证书的剩余有效天数。
pub struct HttpProber {
    timeout: Duration,
    max_body_size: u64,
    user_agent: String,
    clock: Arc<dyn Clock>,
    extra_roots: Vec<reqwest::Certificate>,
}

impl HttpProber {
    pub fn new(timeout: Duration, max_body_size: u64, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            max_body_size: max_body_size.max(1),
            user_agent: user_agent.into(),
            clock: Arc::new(SystemClock),
            extra_roots: Vec::new(),
        }
    }

    pub fn from_settings(settings: &MonitorSettings) -> Self {
        Self::new(
            settings.http_timeout(),
            settings.max_body_size,
            settings.user_agent.clone(),
        )
    }

    /// 使用指定时钟计算证书剩余天数
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// 在系统根证书之外额外信任一个根证书（如内部 CA）
    pub fn with_root_certificate(mut self, certificate: reqwest::Certificate) -> Self {
        self.extra_roots.push(certificate);
        self
    }

    // 每次探测都使用新的客户端，不复用连接
    fn build_client(&self) -> Result<reqwest::Client, ProbeError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .min_tls_version(Version::TLS_1_2)
            .tls_info(true)
            .pool_max_idle_per_host(0);
        for root in &self.extra_roots {
            builder = builder.add_root_certificate(root.clone());
        }
        builder
            .build()
            .map_err(|e| ProbeError::ClientSetup(error_chain(&e)))
    }

    fn inspect_certificate(&self, response: &reqwest::Response, observation: &mut ProbeObservation) {
        let Some(der) = response
            .extensions()
            .get::<TlsInfo>()
            .and_then(|info| info.peer_certificate())
        else {
            return;
        };

        match CertificateExpiry::from_der(der, self.clock.now()) {
            Ok(expiry) => {
                observation.ssl_cert_expiry = Some(expiry.describe());
                observation.warning = expiry.warning();
                if let Some(warning) = &observation.warning {
                    warn!(url = %response.url(), "{}", warning);
                }
            }
            Err(e) => debug!(url = %response.url(), error = %e, "Skipping certificate inspection"),
        }
    }
}

/// 读取响应体，最多 `limit` 字节，超出部分直接丢弃
async fn read_body_limited(
    mut response: reqwest::Response,
    limit: u64,
) -> Result<Bytes, reqwest::Error> {
    let mut body = BytesMut::new();
    while (body.len() as u64) < limit {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let remaining = usize::try_from(limit - body.len() as u64).unwrap_or(usize::MAX);
        body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
    }
    Ok(body.freeze())
}

/// 把 reqwest 错误映射为探测错误
fn classify_request_error(err: &reqwest::Error) -> ProbeError {
    let detail = error_chain(err);
    if err.is_builder() {
        ProbeError::InvalidRequest(detail)
    } else if err.is_timeout() {
        ProbeError::RequestTimeout(detail)
    } else if detail.to_ascii_lowercase().contains("certificate") {
        ProbeError::Certificate(detail)
    } else {
        ProbeError::Transport(detail)
    }
}

/// 拼接完整的错误链，底层原因（如证书错误）通常只出现在 source 里
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &MonitorTarget) -> ProbeAttempt {
        let mut observation = ProbeObservation::default();

        let client = match self.build_client() {
            Ok(client) => client,
            Err(e) => return ProbeAttempt::failed(observation, e),
        };

        let response = match client
            .get(&target.url)
            .header(CONNECTION, HeaderValue::from_static("close"))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProbeAttempt::failed(observation, classify_request_error(&e)),
        };

        let status = response.status();
        observation.status_code = status.as_u16();
        self.inspect_certificate(&response, &mut observation);

        let body = match read_body_limited(response, self.max_body_size).await {
            Ok(body) => body,
            Err(e) => {
                return ProbeAttempt::failed(observation, ProbeError::BodyRead(error_chain(&e)))
            }
        };

        let keyword = target.keyword();
        if let Some(keyword) = keyword {
            observation.keyword_matched = String::from_utf8_lossy(&body).contains(keyword);
        }

        if !status.is_success() {
            return ProbeAttempt::failed(observation, ProbeError::HttpStatus(status.as_u16()));
        }

        if let Some(keyword) = keyword {
            if !observation.keyword_matched {
                return ProbeAttempt::failed(
                    observation,
                    ProbeError::KeywordMissing(keyword.to_string()),
                );
            }
        }

        ProbeAttempt::succeeded(observation)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
#[path = "http_engine_test.rs"]
mod tests;
