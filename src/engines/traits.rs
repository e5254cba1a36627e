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

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::probe_result::{ErrorKind, ProbeObservation};
use crate::domain::models::target::MonitorTarget;

/// 探测错误类型
///
/// 每个变体对应唯一的 `ErrorKind`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// TCP 地址为空或格式错误
    #[error("invalid tcp address, expected tcp://host:port: {0}")]
    InvalidAddress(String),
    /// 端口无法解析
    #[error("invalid port number: {0}")]
    InvalidPort(String),
    /// 无法构造 HTTP 请求
    #[error("invalid http request: {0}")]
    InvalidRequest(String),
    /// TCP 连接超时
    #[error("tcp connect timed out: {0}")]
    ConnectTimeout(String),
    /// TCP 连接失败
    #[error("tcp connect failed: {0}")]
    Connect(String),
    /// HTTP 请求超时
    #[error("http request timed out: {0}")]
    RequestTimeout(String),
    /// 证书校验失败
    #[error("tls certificate verification failed: {0}")]
    Certificate(String),
    /// 其他传输层错误
    #[error("http request failed: {0}")]
    Transport(String),
    /// HTTP 客户端初始化失败
    #[error("http client setup failed: {0}")]
    ClientSetup(String),
    /// 读取响应体失败
    #[error("failed to read response body: {0}")]
    BodyRead(String),
    /// 非 2xx 状态码
    #[error("unexpected http status: {0}")]
    HttpStatus(u16),
    /// 响应体中没有关键词
    #[error("keyword not found in response body: {0}")]
    KeywordMissing(String),
}

impl ProbeError {
    /// 错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::InvalidAddress(_)
            | ProbeError::InvalidPort(_)
            | ProbeError::InvalidRequest(_) => ErrorKind::Invalid,
            ProbeError::ConnectTimeout(_) | ProbeError::RequestTimeout(_) => ErrorKind::Timeout,
            ProbeError::Connect(_) | ProbeError::Transport(_) => ErrorKind::Network,
            ProbeError::Certificate(_) => ErrorKind::Ssl,
            ProbeError::HttpStatus(_) => ErrorKind::Http,
            ProbeError::KeywordMissing(_) => ErrorKind::Keyword,
            ProbeError::ClientSetup(_) | ProbeError::BodyRead(_) => ErrorKind::Unknown,
        }
    }
}

/// 单次探测尝试的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    /// 本次尝试观测到的数据
    pub observation: ProbeObservation,
    /// 成功或带分类的失败
    pub outcome: Result<(), ProbeError>,
}

impl ProbeAttempt {
    pub fn succeeded(observation: ProbeObservation) -> Self {
        Self {
            observation,
            outcome: Ok(()),
        }
    }

    pub fn failed(observation: ProbeObservation, error: ProbeError) -> Self {
        Self {
            observation,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// 探测引擎特质
///
/// 一次调用就是一次尝试，重试由编排层决定。
/// 失败总是以 `ProbeAttempt` 的形式返回，不会向上抛出。
#[async_trait]
pub trait Prober: Send + Sync {
    /// 执行一次探测
    async fn probe(&self, target: &MonitorTarget) -> ProbeAttempt;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
