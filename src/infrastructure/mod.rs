// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节：
/// - 缓存（cache）：按目标地址记忆最近监控结果
/// - 仓库实现（repositories）：检查结果的输出
pub mod cache;
pub mod repositories;
