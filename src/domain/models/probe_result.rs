// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 探测失败分类
///
/// 每个失败结果恰好携带一个分类，成功结果不携带分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 网络错误
    Network,
    /// 超时
    Timeout,
    /// 证书错误
    Ssl,
    /// 非 2xx 状态码
    Http,
    /// 关键词未匹配
    Keyword,
    /// 无效地址
    Invalid,
    /// 其他错误
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Ssl => "ssl",
            ErrorKind::Http => "http",
            ErrorKind::Keyword => "keyword",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 检查状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Success,
    Failed,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Success => "success",
            CheckStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单次尝试的观测数据
///
/// 无论该次尝试成功与否都会尽量填充，例如 503 响应也会记录状态码和证书信息。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeObservation {
    /// HTTP 状态码，TCP 探测为 0
    pub status_code: u16,
    /// 关键词是否匹配
    pub keyword_matched: bool,
    /// 证书到期描述
    pub ssl_cert_expiry: Option<String>,
    /// 证书即将到期的告警
    pub warning: Option<String>,
}

/// 监控结果
///
/// 每次完成的检查恰好产生一个结果，构造后不再修改。
/// `error_kind` 为空当且仅当 `status == Success`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorResult {
    /// 对应监控目标的地址
    #[serde(rename = "targetUrl")]
    pub target_url: String,
    /// 检查状态
    pub status: CheckStatus,
    /// HTTP 状态码
    pub status_code: u16,
    /// 最后一次尝试的耗时（毫秒）
    #[serde(rename = "responseTime")]
    pub response_time_ms: u64,
    /// 证书到期描述
    #[serde(rename = "sslCertExpiry", skip_serializing_if = "Option::is_none", default)]
    pub ssl_cert_expiry: Option<String>,
    /// 关键词匹配结果
    pub keyword_matched: bool,
    /// 错误信息
    #[serde(rename = "errorMsg", skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
    /// 错误分类
    #[serde(rename = "errorType", skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<ErrorKind>,
    /// 告警信息
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
    /// 检查开始时间
    pub checked_at: DateTime<Utc>,
}

impl MonitorResult {
    /// 构造成功结果
    pub fn success(
        target_url: impl Into<String>,
        checked_at: DateTime<Utc>,
        response_time_ms: u64,
        observation: ProbeObservation,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            status: CheckStatus::Success,
            status_code: observation.status_code,
            response_time_ms,
            ssl_cert_expiry: observation.ssl_cert_expiry,
            keyword_matched: observation.keyword_matched,
            error_message: None,
            error_kind: None,
            warning: observation.warning,
            checked_at,
        }
    }

    /// 构造失败结果
    pub fn failed(
        target_url: impl Into<String>,
        checked_at: DateTime<Utc>,
        response_time_ms: u64,
        observation: ProbeObservation,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            status: CheckStatus::Failed,
            status_code: observation.status_code,
            response_time_ms,
            ssl_cert_expiry: observation.ssl_cert_expiry,
            keyword_matched: observation.keyword_matched,
            error_message: Some(message.into()),
            error_kind: Some(kind),
            warning: observation.warning,
            checked_at,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Success
    }
}
