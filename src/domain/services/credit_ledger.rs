// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::member_repository::{MemberRepository, RepositoryError};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// 积分账本错误
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient credits: available {available}, required {required}")]
    InsufficientCredits { available: i64, required: i64 },
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("Credit amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 积分账本
///
/// 所有余额变动都落到仓库的单条条件更新上，
/// 两个并发扣费不可能同时越过零余额下限。
pub struct CreditLedger {
    members: Arc<dyn MemberRepository>,
}

impl CreditLedger {
    pub fn new(members: Arc<dyn MemberRepository>) -> Self {
        Self { members }
    }

    /// 查询余额
    pub async fn balance(&self, email: &str) -> Result<i64, LedgerError> {
        self.members
            .find_by_email(email)
            .await?
            .map(|m| m.credits)
            .ok_or_else(|| LedgerError::MemberNotFound(email.to_string()))
    }

    /// 扣除积分，余额不足时拒绝并保持余额不变
    ///
    /// # 返回值
    ///
    /// * `Ok(i64)` - 扣除后的余额
    /// * `Err(LedgerError::InsufficientCredits)` - 余额不足
    pub async fn deduct(&self, email: &str, amount: i64) -> Result<i64, LedgerError> {
        ensure_positive(amount)?;

        if self.members.try_deduct_credits(email, amount).await? {
            counter!("credits_deducted_total").increment(amount as u64);
            let balance = self.balance(email).await?;
            info!("Deducted {} credits from {}, balance {}", amount, email, balance);
            return Ok(balance);
        }

        // 条件更新未命中：要么会员不存在，要么余额不足
        let available = self.balance(email).await?;
        warn!(
            "Rejected deduction of {} credits from {}: balance {}",
            amount, email, available
        );
        Err(LedgerError::InsufficientCredits {
            available,
            required: amount,
        })
    }

    /// 增加积分（充值审批、管理员手动加分）
    pub async fn credit(&self, email: &str, amount: i64) -> Result<i64, LedgerError> {
        ensure_positive(amount)?;

        if !self.members.add_credits(email, amount).await? {
            return Err(LedgerError::MemberNotFound(email.to_string()));
        }
        counter!("credits_added_total").increment(amount as u64);
        let balance = self.balance(email).await?;
        info!("Credited {} credits to {}, balance {}", amount, email, balance);
        Ok(balance)
    }

    /// 生成失败后退回已扣积分
    pub async fn refund(&self, email: &str, amount: i64) -> Result<i64, LedgerError> {
        counter!("credits_refunded_total").increment(amount.max(0) as u64);
        self.credit(email, amount).await
    }

    /// 管理员直接设置余额
    pub async fn set_balance(&self, email: &str, credits: i64) -> Result<i64, LedgerError> {
        if credits < 0 {
            return Err(LedgerError::InvalidAmount(credits));
        }
        if !self.members.set_credits(email, credits).await? {
            return Err(LedgerError::MemberNotFound(email.to_string()));
        }
        info!("Balance of {} set to {}", email, credits);
        Ok(credits)
    }
}

fn ensure_positive(amount: i64) -> Result<(), LedgerError> {
    if amount <= 0 {
        Err(LedgerError::InvalidAmount(amount))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "credit_ledger_test.rs"]
mod tests;
