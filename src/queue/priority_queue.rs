// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::models::target::{MonitorTarget, TaskPriority};

/// 带优先级的监控任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTask {
    /// 关联的监控目标，无优先级调用时为空
    pub target: Option<MonitorTarget>,
    /// 任务优先级
    pub priority: TaskPriority,
}

impl PriorityTask {
    /// 以目标自身的优先级创建任务
    pub fn new(target: MonitorTarget) -> Self {
        Self {
            priority: target.priority,
            target: Some(target),
        }
    }

    /// 创建不关联目标的任务
    pub fn with_priority(priority: TaskPriority) -> Self {
        Self {
            target: None,
            priority,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.url.as_str())
    }
}

impl Default for PriorityTask {
    fn default() -> Self {
        Self::with_priority(TaskPriority::Normal)
    }
}

/// 可以放入优先级队列的元素
pub trait Prioritized {
    fn priority(&self) -> TaskPriority;
}

impl Prioritized for PriorityTask {
    fn priority(&self) -> TaskPriority {
        self.priority
    }
}

/// 堆内条目
///
/// `sequence` 在入队时单调递增分配，作为次级排序键，
/// 保证同优先级元素按入队顺序出队。
#[derive(Debug)]
struct Entry<T> {
    priority: TaskPriority,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// 优先级队列
///
/// 基于二叉大顶堆，push/pop 均为 O(log n)。
#[derive(Debug)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T: Prioritized> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// 入队，返回分配的序号
    pub fn push(&mut self, item: T) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.heap.push(Entry {
            priority: item.priority(),
            sequence,
            item,
        });
        sequence
    }

    /// 弹出当前优先级最高的元素
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// 取出全部元素，顺序不保证
    pub fn drain(&mut self) -> Vec<T> {
        self.heap.drain().map(|entry| entry.item).collect()
    }
}

impl<T: Prioritized> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
