// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台周期任务和工作器生命周期管理
/// 包括周期监控、缓存清理、配置重新加载和统一关闭
pub mod cache_sweeper;
pub mod config_reloader;
pub mod manager;
pub mod monitor_worker;
pub mod worker;

pub use worker::Worker;
