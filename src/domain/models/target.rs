// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::settings::TargetSettings;

/// 监控目标
///
/// 以 `url` 作为身份标识。`tcp://` 前缀的地址走 TCP 探测，
/// 其余地址按 HTTP(S) 处理。一次检查期间不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorTarget {
    /// 目标地址
    pub url: String,
    /// 响应体需要包含的关键词
    #[serde(default)]
    pub keyword: Option<String>,
    /// 调度优先级
    #[serde(default)]
    pub priority: TaskPriority,
    /// 是否为当前有效的监控目标
    #[serde(default)]
    pub is_current: bool,
}

impl MonitorTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            keyword: None,
            priority: TaskPriority::Normal,
            is_current: true,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// 非空关键词
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    /// 是否为 TCP 目标（前缀不区分大小写）
    pub fn is_tcp(&self) -> bool {
        self.url
            .get(..TCP_SCHEME.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(TCP_SCHEME))
    }
}

pub(crate) const TCP_SCHEME: &str = "tcp://";

impl From<TargetSettings> for MonitorTarget {
    fn from(settings: TargetSettings) -> Self {
        Self {
            url: settings.url,
            keyword: settings.keyword.filter(|k| !k.is_empty()),
            priority: TaskPriority::parse_or_default(settings.priority.as_deref()),
            is_current: settings.is_current,
        }
    }
}

/// 任务优先级
///
/// 数值越大优先级越高：High > Normal > Low
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
}

impl TaskPriority {
    /// 解析优先级字符串，空值或无法识别时回落到 `Normal`
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Normal => write!(f, "normal"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

/// 优先级解析错误
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

impl FromStr for TaskPriority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "normal" => Ok(TaskPriority::Normal),
            "high" => Ok(TaskPriority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}
