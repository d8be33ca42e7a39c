// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::payment_service::{
    PaymentError, PaymentGateway, PaymentSession, PaymentStatus,
};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// 模拟支付网关
///
/// 令牌为商户密钥对 `tid.price` 的签名。网关本身不保存会话，
/// 查询时按申请中的交易号与金额重新签名校验，签名一致即视为已支付，
/// 因此重启后仍可确认此前开启的结账。
pub struct MockPaymentGateway {
    merchant_key: String,
}

impl MockPaymentGateway {
    pub fn new(merchant_key: impl Into<String>) -> Self {
        Self {
            merchant_key: merchant_key.into(),
        }
    }

    fn mac(&self, tid: &str, price: i64) -> Result<HmacSha256, PaymentError> {
        let mut mac = HmacSha256::new_from_slice(self.merchant_key.as_bytes())
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;
        mac.update(format!("{}.{}", tid, price).as_bytes());
        Ok(mac)
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_session(&self, tid: &str, price: i64) -> Result<PaymentSession, PaymentError> {
        let token = hex::encode(self.mac(tid, price)?.finalize().into_bytes());
        debug!("Mock payment session opened for {}", tid);
        Ok(PaymentSession {
            redirect_url: format!("/payments/mock/{}?tid={}", token, tid),
            token,
        })
    }

    async fn status(
        &self,
        tid: &str,
        price: i64,
        token: &str,
    ) -> Result<PaymentStatus, PaymentError> {
        let signature = hex::decode(token.trim()).map_err(|_| PaymentError::UnknownToken)?;
        // verify_slice 为常量时间比较
        self.mac(tid, price)?
            .verify_slice(&signature)
            .map_err(|_| {
                warn!("Payment token mismatch for {}", tid);
                PaymentError::UnknownToken
            })?;
        Ok(PaymentStatus::Paid)
    }
}
