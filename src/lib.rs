// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理监控参数、日志级别和静态目标列表
pub mod config;

/// 领域模块
///
/// 包含监控目标、检查结果以及检查与批量调度服务
pub mod domain;

/// 引擎模块
///
/// 实现 TCP 与 HTTP(S) 探测引擎
pub mod engines;

/// 基础设施模块
///
/// 提供结果缓存和结果输出的具体实现
pub mod infrastructure;

/// 队列模块
///
/// 实现优先级队列和准入控制
pub mod queue;

/// 工具模块
///
/// 提供错误类型、重试策略、时钟和日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现周期监控和缓存清理
pub mod workers;
