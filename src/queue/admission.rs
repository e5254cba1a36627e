// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::sync::Arc;

use metrics::gauge;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::domain::models::target::TaskPriority;
use crate::queue::priority_queue::{Prioritized, PriorityQueue, PriorityTask};

/// 准入控制错误类型
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    /// 控制器已关闭
    #[error("admission controller closed")]
    Closed,
}

/// 等待中的任务及其授权通道
struct Waiter {
    task: PriorityTask,
    grant: oneshot::Sender<AdmissionPermit>,
}

impl Prioritized for Waiter {
    fn priority(&self) -> TaskPriority {
        self.task.priority
    }
}

struct State {
    in_use: usize,
    waiters: PriorityQueue<Waiter>,
    closed: bool,
}

struct Inner {
    capacity: usize,
    state: Mutex<State>,
}

impl Inner {
    /// 归还一个槽位
    ///
    /// 有等待者时槽位直接转交给优先级最高的等待者，`in_use` 不变；
    /// 已放弃等待的任务会被跳过。
    fn release(self: &Arc<Self>) {
        let mut state = self.state.lock();
        while let Some(waiter) = state.waiters.pop() {
            let permit = AdmissionPermit::new(self.clone());
            match waiter.grant.send(permit) {
                Ok(()) => {
                    debug!(
                        priority = %waiter.task.priority,
                        url = waiter.task.url().unwrap_or("-"),
                        "Admission slot handed to waiter"
                    );
                    gauge!("admission_waiters").set(state.waiters.len() as f64);
                    return;
                }
                Err(mut permit) => permit.disarm(),
            }
        }
        state.in_use = state.in_use.saturating_sub(1);
        gauge!("admission_waiters").set(0.0);
    }
}

/// 准入许可
///
/// 持有期间占用一个并发槽位，调用 `release` 或被丢弃时归还。
/// 控制器关闭后归还依然有效。
#[must_use = "the admission slot is released as soon as the permit is dropped"]
pub struct AdmissionPermit {
    inner: Option<Arc<Inner>>,
}

impl AdmissionPermit {
    fn new(inner: Arc<Inner>) -> Self {
        Self { inner: Some(inner) }
    }

    /// 显式归还槽位
    pub fn release(self) {
        drop(self)
    }

    fn disarm(&mut self) {
        self.inner.take();
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.release();
        }
    }
}

impl fmt::Debug for AdmissionPermit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionPermit")
            .field("armed", &self.inner.is_some())
            .finish()
    }
}

/// 优先级准入控制器
///
/// 把同时执行的任务数量限制在 `capacity` 以内。槽位空出时总是交给
/// 当前等待者中优先级最高的任务，同优先级按入队顺序。
///
/// 状态：Open → Closed（终态）。关闭后所有等待中和之后的 `acquire`
/// 都返回 `AdmissionError::Closed`。
///
/// 高优先级任务持续到达时低优先级任务可能一直等待，这是有意接受的取舍。
#[derive(Clone)]
pub struct AdmissionController {
    inner: Arc<Inner>,
}

impl AdmissionController {
    /// 创建控制器，`capacity` 至少为 1
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                capacity: capacity.max(1),
                state: Mutex::new(State {
                    in_use: 0,
                    waiters: PriorityQueue::new(),
                    closed: false,
                }),
            }),
        }
    }

    /// 按任务优先级获取执行许可
    ///
    /// 有空闲槽位且没有等待者时立即返回，否则进入优先级队列等待，
    /// 直到某个 `release` 把槽位转交过来。
    pub async fn acquire_with_priority(
        &self,
        task: PriorityTask,
    ) -> Result<AdmissionPermit, AdmissionError> {
        let granted = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(AdmissionError::Closed);
            }

            if state.waiters.is_empty() && state.in_use < self.inner.capacity {
                state.in_use += 1;
                return Ok(AdmissionPermit::new(self.inner.clone()));
            }

            let (grant, granted) = oneshot::channel();
            debug!(
                priority = %task.priority,
                url = task.url().unwrap_or("-"),
                "Waiting for admission slot"
            );
            state.waiters.push(Waiter { task, grant });
            gauge!("admission_waiters").set(state.waiters.len() as f64);
            granted
        };

        // 发送端只会在控制器关闭时被丢弃
        granted.await.map_err(|_| AdmissionError::Closed)
    }

    /// 以普通优先级获取执行许可
    pub async fn acquire(&self) -> Result<AdmissionPermit, AdmissionError> {
        self.acquire_with_priority(PriorityTask::with_priority(TaskPriority::Normal))
            .await
    }

    /// 关闭控制器，唤醒所有等待者并让它们返回 `Closed`
    pub fn close(&self) {
        let abandoned = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.waiters.drain()
        };

        info!(
            waiters = abandoned.len(),
            "Admission controller closed"
        );
        gauge!("admission_waiters").set(0.0);
        drop(abandoned);
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// 当前被占用的槽位数
    pub fn in_use(&self) -> usize {
        self.inner.state.lock().in_use
    }

    /// 当前等待队列中的任务数
    ///
    /// 已放弃等待（future 被丢弃）的任务仍留在队列里，直到下一次归还槽位时
    /// 才被清除，因此这里和 `admission_waiters` 指标在此之前都会把它们计入。
    pub fn waiting(&self) -> usize {
        self.inner.state.lock().waiters.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }
}

impl fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("AdmissionController")
            .field("capacity", &self.inner.capacity)
            .field("in_use", &state.in_use)
            .field("waiting", &state.waiters.len())
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
#[path = "admission_test.rs"]
mod tests;
