// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供数据库连接和实体管理功能
/// 包括连接池、迁移执行与会员、充值、私信、配置四张表的实体
pub mod connection;
pub mod entities;
