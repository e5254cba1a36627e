// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 监控目标（target）：被探测的地址、关键词与优先级
/// - 监控结果（probe_result）：一次检查的最终结果与失败分类
pub mod probe_result;
pub mod target;
