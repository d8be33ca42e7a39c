// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    models::topup::{TopupRequest, TopupStatus},
    repositories::{
        member_repository::RepositoryError,
        topup_repository::{TopupRepository, TopupTransition},
    },
};
use crate::infrastructure::database::entities::{member, topup_request};

pub struct TopupRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TopupRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(model: topup_request::Model) -> Result<TopupRequest, RepositoryError> {
    Ok(TopupRequest {
        status: model
            .status
            .parse::<TopupStatus>()
            .map_err(RepositoryError::InvalidData)?,
        id: model.id,
        tid: model.tid,
        email: model.email,
        amount: model.amount,
        price: model.price,
        receipt_url: model.receipt_url,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

impl TopupRepositoryImpl {
    /// pending 翻转为终态；只有翻转成功且为审批时才给会员加积分，二者同一事务提交
    async fn transition(
        &self,
        id: Uuid,
        to: TopupStatus,
    ) -> Result<TopupTransition, RepositoryError> {
        let txn = self.db.begin().await?;

        let flipped = topup_request::Entity::update_many()
            .col_expr(topup_request::Column::Status, Expr::value(to.as_str()))
            .filter(topup_request::Column::Id.eq(id))
            .filter(topup_request::Column::Status.eq(TopupStatus::Pending.as_str()))
            .exec(&txn)
            .await?;

        let row = topup_request::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let request = to_domain(row)?;

        if flipped.rows_affected == 0 {
            debug!("Top-up {} already {}", request.tid, request.status);
            txn.commit().await?;
            return Ok(TopupTransition::AlreadyDecided(request));
        }

        if to == TopupStatus::Approved {
            let credited = member::Entity::update_many()
                .col_expr(
                    member::Column::Credits,
                    Expr::col(member::Column::Credits).add(request.amount),
                )
                .filter(member::Column::Email.eq(request.email.as_str()))
                .exec(&txn)
                .await?;

            if credited.rows_affected == 0 {
                txn.rollback().await?;
                return Err(RepositoryError::NotFound);
            }
        }

        txn.commit().await?;
        Ok(TopupTransition::Applied(request))
    }
}

#[async_trait]
impl TopupRepository for TopupRepositoryImpl {
    async fn create(&self, request: &TopupRequest) -> Result<TopupRequest, RepositoryError> {
        let model = topup_request::ActiveModel {
            id: Set(request.id),
            tid: Set(request.tid.clone()),
            email: Set(request.email.clone()),
            amount: Set(request.amount),
            price: Set(request.price),
            receipt_url: Set(request.receipt_url.clone()),
            status: Set(request.status.as_str().to_string()),
            created_at: Set(request.created_at.fixed_offset()),
        };

        topup_request::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(request.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TopupRequest>, RepositoryError> {
        topup_request::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_tid(&self, tid: &str) -> Result<Option<TopupRequest>, RepositoryError> {
        topup_request::Entity::find()
            .filter(topup_request::Column::Tid.eq(tid))
            .one(self.db.as_ref())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn list(
        &self,
        status: Option<TopupStatus>,
        email: Option<&str>,
    ) -> Result<Vec<TopupRequest>, RepositoryError> {
        let mut query = topup_request::Entity::find();
        if let Some(status) = status {
            query = query.filter(topup_request::Column::Status.eq(status.as_str()));
        }
        if let Some(email) = email {
            query = query.filter(topup_request::Column::Email.eq(email));
        }

        query
            .order_by_desc(topup_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn approve(&self, id: Uuid) -> Result<TopupTransition, RepositoryError> {
        self.transition(id, TopupStatus::Approved).await
    }

    async fn reject(&self, id: Uuid) -> Result<TopupTransition, RepositoryError> {
        self.transition(id, TopupStatus::Rejected).await
    }

    async fn count_pending(&self) -> Result<u64, RepositoryError> {
        Ok(topup_request::Entity::find()
            .filter(topup_request::Column::Status.eq(TopupStatus::Pending.as_str()))
            .count(self.db.as_ref())
            .await?)
    }
}
