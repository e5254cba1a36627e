// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提供按目标地址记忆最近监控结果的内存缓存
pub mod result_cache;
