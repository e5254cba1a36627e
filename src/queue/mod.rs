// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 实现优先级队列和基于它的并发准入控制
pub mod admission;
pub mod priority_queue;

pub use admission::{AdmissionController, AdmissionError, AdmissionPermit};
pub use priority_queue::{Prioritized, PriorityQueue, PriorityTask};
