// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::prelude::{FromDer, X509Certificate};

/// 剩余天数低于该值时产生告警
pub const EXPIRY_WARNING_DAYS: i64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// 证书解析错误
#[derive(Error, Debug)]
pub enum TlsInspectError {
    #[error("failed to parse peer certificate: {0}")]
    Parse(String),
    #[error("certificate expiry out of range: {0}")]
    OutOfRange(i64),
}

/// 证书到期信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertificateExpiry {
    pub not_after: DateTime<Utc>,
    pub days_remaining: i64,
}

impl CertificateExpiry {
    pub fn new(not_after: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            not_after,
            days_remaining: days_until(not_after, now),
        }
    }

    /// 从 DER 编码的对端证书中读取到期时间
    pub fn from_der(der: &[u8], now: DateTime<Utc>) -> Result<Self, TlsInspectError> {
        let (_, cert) =
            X509Certificate::from_der(der).map_err(|e| TlsInspectError::Parse(e.to_string()))?;
        let timestamp = cert.validity().not_after.timestamp();
        let not_after = DateTime::from_timestamp(timestamp, 0)
            .ok_or(TlsInspectError::OutOfRange(timestamp))?;
        Ok(Self::new(not_after, now))
    }

    pub fn describe(&self) -> String {
        describe_expiry(self.days_remaining)
    }

    pub fn warning(&self) -> Option<String> {
        expiry_warning(self.days_remaining)
    }
}

/// 距到期的天数，向下取整
pub fn days_until(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    not_after
        .signed_duration_since(now)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

pub fn describe_expiry(days: i64) -> String {
    match days {
        d if d > 0 => format!("expires in {} days", d),
        0 => "expires today".to_string(),
        d => format!("expired {} days ago", -d),
    }
}

/// 剩余不足 `EXPIRY_WARNING_DAYS` 天（含已过期）时的告警，仅作提示，不影响结果状态
pub fn expiry_warning(days: i64) -> Option<String> {
    if days >= EXPIRY_WARNING_DAYS {
        return None;
    }
    if days < 0 {
        Some(format!("SSL certificate expired {} days ago", -days))
    } else {
        Some(format!(
            "SSL certificate expires soon ({} days remaining)",
            days
        ))
    }
}
