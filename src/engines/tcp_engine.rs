// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

use crate::domain::models::probe_result::ProbeObservation;
use crate::domain::models::target::{MonitorTarget, TCP_SCHEME};
use crate::engines::traits::{ProbeAttempt, ProbeError, Prober};

/// TCP 探测引擎
///
/// 只验证能否在超时内建立连接，连接建立后立即关闭，不收发任何数据
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// 常用服务名到端口的映射（取自 IANA 服务注册表）
const WELL_KNOWN_SERVICES: &[(&str, u16)] = &[
    ("ftp", 21),
    ("ssh", 22),
    ("telnet", 23),
    ("smtp", 25),
    ("domain", 53),
    ("http", 80),
    ("pop3", 110),
    ("imap", 143),
    ("ldap", 389),
    ("https", 443),
    ("smtps", 465),
    ("submission", 587),
    ("ldaps", 636),
    ("imaps", 993),
    ("pop3s", 995),
    ("mysql", 3306),
    ("postgresql", 5432),
    ("amqp", 5672),
    ("redis", 6379),
    ("mongodb", 27017),
];

/// 把端口字段解析为端口号
///
/// 支持十进制数字和常用服务名（大小写不敏感，如 `https`、`ssh`）
pub fn resolve_port(port: &str) -> Result<u16, ProbeError> {
    if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
        return port
            .parse()
            .map_err(|_| ProbeError::InvalidPort(port.to_string()));
    }
    WELL_KNOWN_SERVICES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(port))
        .map(|&(_, number)| number)
        .ok_or_else(|| ProbeError::InvalidPort(port.to_string()))
}

/// 解析 `tcp://host:port`，返回可用于连接的 `host:port`
///
/// 前缀大小写不敏感；IPv6 主机需要用方括号包裹；端口可以是十进制数字
/// 或常用服务名。
pub fn parse_tcp_address(url: &str) -> Result<String, ProbeError> {
    let address = match url.get(..TCP_SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(TCP_SCHEME) => &url[TCP_SCHEME.len()..],
        _ => url,
    };

    if address.is_empty() {
        return Err(ProbeError::InvalidAddress(url.to_string()));
    }

    let (host, port) = if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| ProbeError::InvalidAddress(url.to_string()))?;
        let port = tail
            .strip_prefix(':')
            .ok_or_else(|| ProbeError::InvalidAddress(url.to_string()))?;
        (host, port)
    } else {
        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| ProbeError::InvalidAddress(url.to_string()))?;
        // 未加方括号的 IPv6 地址无法区分端口
        if host.contains(':') {
            return Err(ProbeError::InvalidAddress(url.to_string()));
        }
        (host, port)
    };

    if host.is_empty() {
        return Err(ProbeError::InvalidAddress(url.to_string()));
    }
    let port = resolve_port(port)?;

    if host.contains(':') {
        Ok(format!("[{}]:{}", host, port))
    } else {
        Ok(format!("{}:{}", host, port))
    }
}

fn classify_connect_error(address: &str, err: io::Error) -> ProbeError {
    if err.kind() == io::ErrorKind::TimedOut {
        ProbeError::ConnectTimeout(format!("{}: {}", address, err))
    } else {
        ProbeError::Connect(format!("{}: {}", address, err))
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: &MonitorTarget) -> ProbeAttempt {
        let observation = ProbeObservation::default();

        let address = match parse_tcp_address(&target.url) {
            Ok(address) => address,
            Err(e) => return ProbeAttempt::failed(observation, e),
        };

        match tokio::time::timeout(self.timeout, TcpStream::connect(&address)).await {
            Ok(Ok(stream)) => {
                debug!(address = %address, "TCP connection established");
                drop(stream);
                ProbeAttempt::succeeded(observation)
            }
            Ok(Err(e)) => ProbeAttempt::failed(observation, classify_connect_error(&address, e)),
            Err(_) => ProbeAttempt::failed(
                observation,
                ProbeError::ConnectTimeout(format!(
                    "{}: no connection after {:?}",
                    address, self.timeout
                )),
            ),
        }
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}

#[cfg(test)]
#[path = "tcp_engine_test.rs"]
mod tests;
