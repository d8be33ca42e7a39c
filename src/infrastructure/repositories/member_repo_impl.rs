// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use std::sync::Arc;

use crate::domain::{
    models::member::{Member, MemberFilter, MemberStatus, MemberUpdate},
    repositories::member_repository::{MemberRepository, RepositoryError},
};
use crate::infrastructure::database::entities::member;

pub struct MemberRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl MemberRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(model: member::Model) -> Result<Member, RepositoryError> {
    Ok(Member {
        status: model
            .status
            .parse::<MemberStatus>()
            .map_err(RepositoryError::InvalidData)?,
        email: model.email,
        full_name: model.full_name,
        password_hash: model.password_hash,
        credits: model.credits,
        valid_until: model.valid_until.map(|t| t.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        last_seen: model.last_seen.map(|t| t.with_timezone(&Utc)),
    })
}

fn map_insert_error(err: DbErr, email: &str) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            RepositoryError::AlreadyExists(email.to_string())
        }
        _ => RepositoryError::Database(err),
    }
}

#[async_trait]
impl MemberRepository for MemberRepositoryImpl {
    async fn create(&self, m: &Member) -> Result<Member, RepositoryError> {
        let model = member::ActiveModel {
            email: Set(m.email.clone()),
            full_name: Set(m.full_name.clone()),
            password_hash: Set(m.password_hash.clone()),
            status: Set(m.status.as_str().to_string()),
            credits: Set(m.credits),
            valid_until: Set(m.valid_until.map(|t| t.fixed_offset())),
            created_at: Set(m.created_at.fixed_offset()),
            last_seen: Set(m.last_seen.map(|t| t.fixed_offset())),
        };

        // 不依赖 insert 的回读，SQLite 与 Postgres 行为一致
        member::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| map_insert_error(e, &m.email))?;

        Ok(m.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError> {
        member::Entity::find_by_id(email.to_string())
            .one(self.db.as_ref())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn list(&self, filter: &MemberFilter) -> Result<Vec<Member>, RepositoryError> {
        let mut query = member::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(member::Column::Status.eq(status.as_str()));
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(member::Column::Email.like(pattern.clone()))
                    .add(
                        Expr::expr(Func::lower(Expr::col(member::Column::FullName)))
                            .like(pattern),
                    ),
            );
        }

        let models = query
            .order_by_desc(member::Column::CreatedAt)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(self.db.as_ref())
            .await?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update_profile(
        &self,
        email: &str,
        update: &MemberUpdate,
    ) -> Result<Member, RepositoryError> {
        let model = member::Entity::find_by_id(email.to_string())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: member::ActiveModel = model.into();
        if let Some(name) = &update.full_name {
            active.full_name = Set(name.clone());
        }
        if let Some(status) = update.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(valid_until) = update.valid_until {
            active.valid_until = Set(valid_until.map(|t| t.fixed_offset()));
        }

        let updated = active.update(self.db.as_ref()).await?;
        to_domain(updated)
    }

    async fn delete(&self, email: &str) -> Result<bool, RepositoryError> {
        let result = member::Entity::delete_by_id(email.to_string())
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn touch_last_seen(
        &self,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        member::Entity::update_many()
            .col_expr(member::Column::LastSeen, Expr::value(at.fixed_offset()))
            .filter(member::Column::Email.eq(email))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn try_deduct_credits(&self, email: &str, amount: i64) -> Result<bool, RepositoryError> {
        // 余额下限由 WHERE 条件保证，并发扣费只有一个能命中
        let result = member::Entity::update_many()
            .col_expr(
                member::Column::Credits,
                Expr::col(member::Column::Credits).sub(amount),
            )
            .filter(member::Column::Email.eq(email))
            .filter(member::Column::Credits.gte(amount))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn add_credits(&self, email: &str, amount: i64) -> Result<bool, RepositoryError> {
        let result = member::Entity::update_many()
            .col_expr(
                member::Column::Credits,
                Expr::col(member::Column::Credits).add(amount),
            )
            .filter(member::Column::Email.eq(email))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn set_credits(&self, email: &str, credits: i64) -> Result<bool, RepositoryError> {
        let result = member::Entity::update_many()
            .col_expr(member::Column::Credits, Expr::value(credits))
            .filter(member::Column::Email.eq(email))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn expire_memberships(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = member::Entity::update_many()
            .col_expr(
                member::Column::Status,
                Expr::value(MemberStatus::Inactive.as_str()),
            )
            .filter(member::Column::Status.eq(MemberStatus::Active.as_str()))
            .filter(member::Column::ValidUntil.is_not_null())
            .filter(member::Column::ValidUntil.lte(now.fixed_offset()))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }

    async fn count_by_status(&self) -> Result<Vec<(MemberStatus, u64)>, RepositoryError> {
        let rows: Vec<(String, i64)> = member::Entity::find()
            .select_only()
            .column(member::Column::Status)
            .column_as(Expr::col(member::Column::Email).count(), "count")
            .group_by(member::Column::Status)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = status
                    .parse::<MemberStatus>()
                    .map_err(RepositoryError::InvalidData)?;
                Ok((status, count.max(0) as u64))
            })
            .collect()
    }
}
