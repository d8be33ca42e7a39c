// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::member_repository::RepositoryError;
use crate::domain::models::topup::{TopupRequest, TopupStatus};
use async_trait::async_trait;
use uuid::Uuid;

/// 审批操作的结果
#[derive(Debug, Clone)]
pub enum TopupTransition {
    /// 本次调用完成了 pending 到终态的转换
    Applied(TopupRequest),
    /// 申请此前已被处理，未做任何修改
    AlreadyDecided(TopupRequest),
}

/// 充值申请仓库特质
#[async_trait]
pub trait TopupRepository: Send + Sync {
    async fn create(&self, request: &TopupRequest) -> Result<TopupRequest, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TopupRequest>, RepositoryError>;
    async fn find_by_tid(&self, tid: &str) -> Result<Option<TopupRequest>, RepositoryError>;
    /// 按状态和邮箱过滤，按创建时间倒序
    async fn list(
        &self,
        status: Option<TopupStatus>,
        email: Option<&str>,
    ) -> Result<Vec<TopupRequest>, RepositoryError>;
    /// 在同一事务内把 pending 置为 approved 并给会员加积分
    async fn approve(&self, id: Uuid) -> Result<TopupTransition, RepositoryError>;
    /// 把 pending 置为 rejected
    async fn reject(&self, id: Uuid) -> Result<TopupTransition, RepositoryError>;
    async fn count_pending(&self) -> Result<u64, RepositoryError>;
}
