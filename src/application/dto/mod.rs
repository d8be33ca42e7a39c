// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义HTTP请求体与查询参数，使用 validator 做格式校验，
/// 业务规则校验留给领域服务
pub mod admin_request;
pub mod auth_request;
pub mod generation_request;
pub mod message_request;
pub mod topup_request;
