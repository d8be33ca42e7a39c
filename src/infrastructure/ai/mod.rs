// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 生成式AI接入模块
///
/// 提供领域层 `GenerativeClient` 特质基于 REST 接口的实现
pub mod gemini_client;
