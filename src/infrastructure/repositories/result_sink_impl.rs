// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use crate::domain::models::probe_result::MonitorResult;
use crate::domain::repositories::result_sink::ResultSink;
use crate::utils::errors::MonitorError;

/// 日志输出
///
/// 每个结果序列化为一行 JSON，通过 tracing 输出到 `probewatch::results` 目标
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResultSink;

#[async_trait]
impl ResultSink for LogResultSink {
    async fn record(&self, results: &[MonitorResult]) -> Result<(), MonitorError> {
        for result in results {
            let line =
                serde_json::to_string(result).map_err(|e| MonitorError::Sink(e.to_string()))?;
            info!(target: "probewatch::results", "{}", line);
        }
        Ok(())
    }
}

/// 内存输出，按轮次保存所有结果
#[derive(Debug, Default)]
pub struct MemoryResultSink {
    rounds: Mutex<Vec<Vec<MonitorResult>>>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds(&self) -> Vec<Vec<MonitorResult>> {
        self.rounds.lock().clone()
    }

    pub fn round_count(&self) -> usize {
        self.rounds.lock().len()
    }
}

#[async_trait]
impl ResultSink for MemoryResultSink {
    async fn record(&self, results: &[MonitorResult]) -> Result<(), MonitorError> {
        self.rounds.lock().push(results.to_vec());
        Ok(())
    }
}
