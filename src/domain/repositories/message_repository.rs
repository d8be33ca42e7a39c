// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::member_repository::RepositoryError;
use crate::domain::models::message::DirectMessage;
use async_trait::async_trait;
use uuid::Uuid;

/// 私信仓库特质
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &DirectMessage) -> Result<DirectMessage, RepositoryError>;
    /// 收件箱，最新在前
    async fn inbox(&self, receiver: &str) -> Result<Vec<DirectMessage>, RepositoryError>;
    /// 两人之间的往来消息，按时间正序
    async fn conversation(&self, a: &str, b: &str) -> Result<Vec<DirectMessage>, RepositoryError>;
    /// 仅收件人本人可以标记已读
    async fn mark_read(&self, id: Uuid, receiver: &str) -> Result<bool, RepositoryError>;
    async fn unread_count(&self, receiver: &str) -> Result<u64, RepositoryError>;
}
