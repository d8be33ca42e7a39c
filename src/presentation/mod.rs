// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 错误到 JSON 响应的映射
pub mod errors;
/// 会话提取器
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
