// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 服务检查（service_checker）：单个目标的缓存、探测、重试逻辑
/// - 监控服务（monitor_service）：在准入控制下批量检查目标
pub mod monitor_service;
pub mod service_checker;
