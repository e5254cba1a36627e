// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：监控目标与检查结果
/// - 输出接口（repositories）：检查结果的输出抽象
/// - 服务（services）：检查、重试与批量调度
pub mod models;
pub mod repositories;
pub mod services;
