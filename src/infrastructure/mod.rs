// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 生成式AI（ai）：生成式AI REST 客户端
/// - 数据库（database）：提供数据库连接和实体映射
/// - 指标（metrics）：Prometheus 指标导出
/// - 仓库实现（repositories）：提供领域仓库接口的具体实现
/// - 服务（services）：管理员通知与支付网关
///
/// 基础设施层遵循依赖倒置原则，依赖于领域层的抽象接口，
/// 确保领域层保持纯粹的业务逻辑，不受技术实现的影响。
pub mod ai;
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod services;
