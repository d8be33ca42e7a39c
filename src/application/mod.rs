// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求与响应的数据传输对象，
/// 负责在API请求和领域模型之间转换数据
pub mod dto;
