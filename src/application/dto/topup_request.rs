// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

/// 附收据的人工充值申请
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTopupRequestDto {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,
    #[validate(url(message = "Receipt must be a valid URL"))]
    pub receipt_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequestDto {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmTopupRequestDto {
    #[validate(length(min = 1, message = "Transaction id cannot be empty"))]
    pub tid: String,
    /// 结账时网关签发的支付令牌
    #[validate(length(min = 1, message = "Payment token cannot be empty"))]
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopupListQuery {
    pub status: Option<String>,
}
