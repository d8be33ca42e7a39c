// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施服务模块
///
/// 提供领域层外部接口特质的具体实现，
/// 包括管理员通知与支付网关
pub mod mock_payment_gateway;
pub mod telegram_notifier;
