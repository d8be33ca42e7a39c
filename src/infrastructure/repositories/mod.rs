// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口基于 SeaORM 的数据库实现。
/// 积分变动一律使用带条件的单条 UPDATE，不做先读后写。
pub mod member_repo_impl;
pub mod message_repo_impl;
pub mod settings_repo_impl;
pub mod topup_repo_impl;
