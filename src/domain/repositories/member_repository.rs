// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::member::{Member, MemberFilter, MemberStatus, MemberUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 记录已存在
    #[error("Record already exists: {0}")]
    AlreadyExists(String),
    /// 数据库中的值无法映射为领域类型
    #[error("Invalid stored value: {0}")]
    InvalidData(String),
}

/// 会员仓库特质
///
/// 积分相关的方法都必须是单条原子更新，调用方不做先读后写。
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// 创建会员，邮箱重复时返回 `AlreadyExists`
    async fn create(&self, member: &Member) -> Result<Member, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, RepositoryError>;
    async fn list(&self, filter: &MemberFilter) -> Result<Vec<Member>, RepositoryError>;
    async fn update_profile(
        &self,
        email: &str,
        update: &MemberUpdate,
    ) -> Result<Member, RepositoryError>;
    /// 删除会员，返回是否确实删除了记录
    async fn delete(&self, email: &str) -> Result<bool, RepositoryError>;
    async fn touch_last_seen(&self, email: &str, at: DateTime<Utc>)
        -> Result<(), RepositoryError>;
    /// 仅当余额不少于 `amount` 时扣减，返回是否扣减成功
    async fn try_deduct_credits(&self, email: &str, amount: i64) -> Result<bool, RepositoryError>;
    /// 增加余额，会员不存在时返回 false
    async fn add_credits(&self, email: &str, amount: i64) -> Result<bool, RepositoryError>;
    /// 直接覆盖余额，会员不存在时返回 false
    async fn set_credits(&self, email: &str, credits: i64) -> Result<bool, RepositoryError>;
    /// 将已过期的 active 会员置为 inactive，返回受影响行数
    async fn expire_memberships(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
    async fn count_by_status(&self) -> Result<Vec<(MemberStatus, u64)>, RepositoryError>;
}
