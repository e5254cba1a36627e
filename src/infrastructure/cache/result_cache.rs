// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::models::probe_result::MonitorResult;
use crate::utils::clock::{Clock, SystemClock};

/// 监控结果缓存
///
/// 按目标地址保存最近一次结果。条目不单独记录过期时间，
/// 当 `now - checked_at > ttl` 时视为过期。整个映射由一把读写锁保护。
pub struct ResultCache {
    entries: RwLock<HashMap<String, MonitorResult>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
        }
    }

    fn is_fresh(&self, result: &MonitorResult) -> bool {
        self.clock.now().signed_duration_since(result.checked_at) <= self.ttl
    }

    /// 获取未过期的缓存结果
    pub fn get(&self, target_url: &str) -> Option<MonitorResult> {
        let entries = self.entries.read();
        entries
            .get(target_url)
            .filter(|result| self.is_fresh(result))
            .cloned()
    }

    /// 写入结果，覆盖同一地址的旧条目
    pub fn insert(&self, result: MonitorResult) {
        let mut entries = self.entries.write();
        entries.insert(result.target_url.clone(), result);
    }

    /// 清理所有过期条目，返回清理数量
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, result| now.signed_duration_since(result.checked_at) <= self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Purged expired cache entries");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or(Duration::MAX)
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}
