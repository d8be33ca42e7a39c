// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 充值申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopupStatus {
    Pending,
    Approved,
    Rejected,
}

impl TopupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopupStatus::Pending => "pending",
            TopupStatus::Approved => "approved",
            TopupStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TopupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(TopupStatus::Pending),
            "approved" => Ok(TopupStatus::Approved),
            "rejected" => Ok(TopupStatus::Rejected),
            other => Err(format!("unknown topup status: {}", other)),
        }
    }
}

/// 充值申请
///
/// 由会员发起，经支付网关自动审批或由管理员根据收据人工审批。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupRequest {
    pub id: Uuid,
    /// 交易号，对外展示并用于支付网关回查
    pub tid: String,
    pub email: String,
    /// 充值积分数
    pub amount: i64,
    /// 支付金额（最小货币单位）
    pub price: i64,
    pub receipt_url: Option<String>,
    pub status: TopupStatus,
    pub created_at: DateTime<Utc>,
}

impl TopupRequest {
    pub fn new(email: String, amount: i64, price: i64, receipt_url: Option<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            tid: generate_tid(id),
            email,
            amount,
            price,
            receipt_url,
            status: TopupStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// 生成形如 `TRX-20260101-1A2B3C4D` 的交易号
fn generate_tid(id: Uuid) -> String {
    let simple = id.simple().to_string().to_uppercase();
    format!("TRX-{}-{}", Utc::now().format("%Y%m%d"), &simple[..8])
}
