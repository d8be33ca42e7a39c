// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了
/// 业务规则，协调多个仓库与外部接口来完成业务操作。
///
/// 包含的服务：
/// - 认证服务（auth_service）：注册、登录与会话签发
/// - 积分账本（credit_ledger）：原子化的余额扣减与增加
/// - 生成服务（generation_service）：计费、密钥轮换重试与各类生成功能
/// - 充值服务（topup_service）：充值申请、网关结账与审批
/// - 私信服务（message_service）：会员与管理员之间的站内信
/// - 管理服务（admin_service）：会员管理、导出与统计
///
/// 外部系统通过特质抽象：生成式AI（genai_service）、
/// 支付网关（payment_service）与管理员通知（notification_service），
/// 具体实现位于基础设施层。
pub mod admin_service;
pub mod auth_service;
pub mod credit_ledger;
pub mod genai_service;
pub mod generation_service;
pub mod key_rotation;
pub mod message_service;
pub mod notification_service;
pub mod payment_service;
pub mod settings_service;
pub mod topup_service;

#[cfg(test)]
pub(crate) mod test_support;
