// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 支付网关错误
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Unknown payment token")]
    UnknownToken,
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

/// 支付会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// 交给前端完成支付的令牌
    pub token: String,
    /// 支付页面地址
    pub redirect_url: String,
}

/// 支付状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// 支付网关特质
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 为交易号创建支付会话
    async fn create_session(&self, tid: &str, price: i64) -> Result<PaymentSession, PaymentError>;
    /// 查询交易的支付状态
    ///
    /// `price` 取自已保存的充值申请，`token` 为结账时签发给前端的支付令牌
    async fn status(&self, tid: &str, price: i64, token: &str)
        -> Result<PaymentStatus, PaymentError>;
}
