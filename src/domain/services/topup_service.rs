// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::topup::{TopupRequest, TopupStatus};
use crate::domain::repositories::member_repository::RepositoryError;
use crate::domain::repositories::topup_repository::{TopupRepository, TopupTransition};
use crate::domain::services::auth_service::Session;
use crate::domain::services::notification_service::Notifier;
use crate::domain::services::payment_service::{
    PaymentError, PaymentGateway, PaymentSession, PaymentStatus,
};
use crate::utils::validators::{validate_receipt_url, ValidationError};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// 充值错误
#[derive(Error, Debug)]
pub enum TopupError {
    #[error("Top-up request not found")]
    NotFound,
    #[error("Top-up request was already {0}")]
    AlreadyDecided(TopupStatus),
    #[error("Top-up amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error("Top-up price cannot be negative, got {0}")]
    InvalidPrice(i64),
    #[error("Payment for {0} has not been completed")]
    PaymentIncomplete(String),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 网关结账结果
#[derive(Debug, Clone, Serialize)]
pub struct Checkout {
    pub request: TopupRequest,
    pub payment: PaymentSession,
}

/// 充值服务
///
/// 会员可以上传收据人工充值，也可以通过支付网关结账后自动审批。
/// 审批把申请从 pending 翻转为 approved，且只有翻转成功时才给会员加积分。
pub struct TopupService {
    repo: Arc<dyn TopupRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn Notifier>,
    price_per_credit: i64,
}

impl TopupService {
    pub fn new(
        repo: Arc<dyn TopupRepository>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
        price_per_credit: i64,
    ) -> Self {
        Self {
            repo,
            gateway,
            notifier,
            price_per_credit,
        }
    }

    /// 附收据的人工充值申请
    pub async fn create_request(
        &self,
        session: &Session,
        amount: i64,
        price: i64,
        receipt_url: Option<&str>,
    ) -> Result<TopupRequest, TopupError> {
        ensure_amount(amount)?;
        if price < 0 {
            return Err(TopupError::InvalidPrice(price));
        }
        let receipt_url = match receipt_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => {
                validate_receipt_url(url)?;
                Some(url.to_string())
            }
            None => None,
        };

        let request = self
            .repo
            .create(&TopupRequest::new(
                session.email.clone(),
                amount,
                price,
                receipt_url,
            ))
            .await?;

        info!("Top-up request {} created by {}", request.tid, request.email);
        self.notifier
            .notify(&format!(
                "New top-up request {}\nMember: {}\nCredits: {}\nPrice: {}\nReceipt: {}",
                request.tid,
                request.email,
                request.amount,
                request.price,
                request.receipt_url.as_deref().unwrap_or("-")
            ))
            .await;

        Ok(request)
    }

    /// 通过支付网关结账
    pub async fn checkout(&self, session: &Session, amount: i64) -> Result<Checkout, TopupError> {
        ensure_amount(amount)?;
        let price = amount.saturating_mul(self.price_per_credit);

        let request = self
            .repo
            .create(&TopupRequest::new(session.email.clone(), amount, price, None))
            .await?;
        let payment = self.gateway.create_session(&request.tid, price).await?;

        info!(
            "Checkout {} opened for {} ({} credits, price {})",
            request.tid, request.email, amount, price
        );
        Ok(Checkout { request, payment })
    }

    /// 支付完成后确认，网关确认已支付则自动审批
    pub async fn confirm(
        &self,
        session: &Session,
        tid: &str,
        token: &str,
    ) -> Result<TopupRequest, TopupError> {
        let request = self
            .repo
            .find_by_tid(tid)
            .await?
            .filter(|r| r.email == session.email)
            .ok_or(TopupError::NotFound)?;

        match request.status {
            TopupStatus::Approved => return Ok(request),
            TopupStatus::Rejected => return Err(TopupError::AlreadyDecided(request.status)),
            TopupStatus::Pending => {}
        }

        match self.gateway.status(tid, request.price, token).await? {
            PaymentStatus::Paid => {}
            status => {
                warn!("Confirm for {} refused, payment status {:?}", tid, status);
                return Err(TopupError::PaymentIncomplete(tid.to_string()));
            }
        }

        match self.repo.approve(request.id).await? {
            TopupTransition::Applied(approved) => {
                self.record_approval(&approved).await;
                Ok(approved)
            }
            TopupTransition::AlreadyDecided(current) if current.status == TopupStatus::Approved => {
                Ok(current)
            }
            TopupTransition::AlreadyDecided(current) => {
                Err(TopupError::AlreadyDecided(current.status))
            }
        }
    }

    /// 当前会员自己的充值记录
    pub async fn list_mine(&self, session: &Session) -> Result<Vec<TopupRequest>, TopupError> {
        Ok(self.repo.list(None, Some(&session.email)).await?)
    }

    /// 管理员查看充值申请
    pub async fn list(&self, status: Option<TopupStatus>) -> Result<Vec<TopupRequest>, TopupError> {
        Ok(self.repo.list(status, None).await?)
    }

    /// 管理员审批；已处理过的申请返回冲突
    pub async fn approve(&self, id: Uuid) -> Result<TopupRequest, TopupError> {
        match self.repo.approve(id).await {
            Ok(TopupTransition::Applied(approved)) => {
                self.record_approval(&approved).await;
                Ok(approved)
            }
            Ok(TopupTransition::AlreadyDecided(current)) => {
                warn!("Top-up {} was already {}", current.tid, current.status);
                Err(TopupError::AlreadyDecided(current.status))
            }
            Err(RepositoryError::NotFound) => Err(TopupError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// 管理员驳回
    pub async fn reject(&self, id: Uuid) -> Result<TopupRequest, TopupError> {
        match self.repo.reject(id).await {
            Ok(TopupTransition::Applied(rejected)) => {
                info!("Top-up {} rejected", rejected.tid);
                Ok(rejected)
            }
            Ok(TopupTransition::AlreadyDecided(current)) => {
                Err(TopupError::AlreadyDecided(current.status))
            }
            Err(RepositoryError::NotFound) => Err(TopupError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn pending_count(&self) -> Result<u64, TopupError> {
        Ok(self.repo.count_pending().await?)
    }

    async fn record_approval(&self, approved: &TopupRequest) {
        counter!("credits_added_total").increment(approved.amount as u64);
        counter!("topups_approved_total").increment(1);
        info!(
            "Top-up {} approved, {} credits added to {}",
            approved.tid, approved.amount, approved.email
        );
        self.notifier
            .notify(&format!(
                "Top-up {} approved: {} credits for {}",
                approved.tid, approved.amount, approved.email
            ))
            .await;
    }
}

fn ensure_amount(amount: i64) -> Result<(), TopupError> {
    if amount <= 0 {
        return Err(TopupError::InvalidAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
#[path = "topup_service_test.rs"]
mod tests;
