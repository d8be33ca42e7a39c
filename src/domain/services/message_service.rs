// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::message::DirectMessage;
use crate::domain::repositories::member_repository::{MemberRepository, RepositoryError};
use crate::domain::repositories::message_repository::MessageRepository;
use crate::domain::services::auth_service::{AdminDirectory, Session};
use crate::utils::validators::normalize_email;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// 单条私信最大字符数
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// 私信错误
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Members can only send messages to administrators")]
    Forbidden,
    #[error("No administrator is configured to receive messages")]
    NoRecipient,
    #[error("A recipient is required")]
    RecipientRequired,
    #[error("Recipient not found: {0}")]
    UnknownRecipient(String),
    #[error("Message content cannot be empty")]
    EmptyContent,
    #[error("Message exceeds 4000 characters")]
    TooLong,
    #[error("Message not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 私信服务
///
/// 会员只能给管理员发消息，管理员可以给任何会员发消息。
pub struct MessageService {
    repo: Arc<dyn MessageRepository>,
    members: Arc<dyn MemberRepository>,
    admins: Arc<AdminDirectory>,
}

impl MessageService {
    pub fn new(
        repo: Arc<dyn MessageRepository>,
        members: Arc<dyn MemberRepository>,
        admins: Arc<AdminDirectory>,
    ) -> Self {
        Self {
            repo,
            members,
            admins,
        }
    }

    /// 发送私信；会员未指定收件人时发给首个管理员
    pub async fn send(
        &self,
        session: &Session,
        to: Option<&str>,
        content: &str,
    ) -> Result<DirectMessage, MessageError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(MessageError::EmptyContent);
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(MessageError::TooLong);
        }

        let receiver = match to.map(normalize_email).filter(|t| !t.is_empty()) {
            Some(receiver) => receiver,
            None if session.is_admin() => return Err(MessageError::RecipientRequired),
            None => self
                .admins
                .primary()
                .map(str::to_string)
                .ok_or(MessageError::NoRecipient)?,
        };

        let receiver_is_admin = self.admins.is_admin(&receiver);
        if !session.is_admin() && !receiver_is_admin {
            return Err(MessageError::Forbidden);
        }
        if !receiver_is_admin && self.members.find_by_email(&receiver).await?.is_none() {
            return Err(MessageError::UnknownRecipient(receiver));
        }

        let message = self
            .repo
            .create(&DirectMessage::new(
                session.email.clone(),
                receiver,
                content.to_string(),
            ))
            .await?;
        info!(
            "Message {} sent from {} to {}",
            message.id, message.sender_email, message.receiver_email
        );
        Ok(message)
    }

    pub async fn inbox(&self, session: &Session) -> Result<Vec<DirectMessage>, MessageError> {
        Ok(self.repo.inbox(&session.email).await?)
    }

    /// 与某人的往来消息，按时间正序
    pub async fn conversation(
        &self,
        session: &Session,
        with: &str,
    ) -> Result<Vec<DirectMessage>, MessageError> {
        Ok(self
            .repo
            .conversation(&session.email, &normalize_email(with))
            .await?)
    }

    /// 标记已读，只有收件人本人可以操作
    pub async fn mark_read(&self, session: &Session, id: Uuid) -> Result<(), MessageError> {
        if self.repo.mark_read(id, &session.email).await? {
            Ok(())
        } else {
            Err(MessageError::NotFound)
        }
    }

    pub async fn unread_count(&self, session: &Session) -> Result<u64, MessageError> {
        Ok(self.repo.unread_count(&session.email).await?)
    }
}
