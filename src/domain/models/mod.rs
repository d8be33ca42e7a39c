// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 会员（member）：账号、状态与积分余额
/// - 充值（topup）：充值申请与审批状态
/// - 私信（message）：会员与管理员之间的站内信
/// - 配置（setting）：键值配置与功能计费
/// - 生成（generation）：生成式AI请求与结果类型
pub mod generation;
pub mod member;
pub mod message;
pub mod setting;
pub mod topup;
