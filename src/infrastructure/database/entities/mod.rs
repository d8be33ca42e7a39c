// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 定义数据库表对应的实体结构，使用SeaORM框架进行对象关系映射。
/// 状态字段以小写字符串存储，由仓库实现负责与领域枚举互转。
pub mod direct_message;
pub mod member;
pub mod setting;
pub mod topup_request;
