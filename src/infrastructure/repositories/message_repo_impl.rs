// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    models::message::DirectMessage,
    repositories::{member_repository::RepositoryError, message_repository::MessageRepository},
};
use crate::infrastructure::database::entities::direct_message;

pub struct MessageRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl MessageRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<direct_message::Model> for DirectMessage {
    fn from(model: direct_message::Model) -> Self {
        Self {
            id: model.id,
            sender_email: model.sender_email,
            receiver_email: model.receiver_email,
            content: model.content,
            created_at: model.created_at.with_timezone(&Utc),
            is_read: model.is_read,
        }
    }
}

#[async_trait]
impl MessageRepository for MessageRepositoryImpl {
    async fn create(&self, message: &DirectMessage) -> Result<DirectMessage, RepositoryError> {
        let model = direct_message::ActiveModel {
            id: Set(message.id),
            sender_email: Set(message.sender_email.clone()),
            receiver_email: Set(message.receiver_email.clone()),
            content: Set(message.content.clone()),
            created_at: Set(message.created_at.fixed_offset()),
            is_read: Set(message.is_read),
        };

        direct_message::Entity::insert(model)
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(message.clone())
    }

    async fn inbox(&self, receiver: &str) -> Result<Vec<DirectMessage>, RepositoryError> {
        Ok(direct_message::Entity::find()
            .filter(direct_message::Column::ReceiverEmail.eq(receiver))
            .order_by_desc(direct_message::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(DirectMessage::from)
            .collect())
    }

    async fn conversation(&self, a: &str, b: &str) -> Result<Vec<DirectMessage>, RepositoryError> {
        let between = Condition::any()
            .add(
                Condition::all()
                    .add(direct_message::Column::SenderEmail.eq(a))
                    .add(direct_message::Column::ReceiverEmail.eq(b)),
            )
            .add(
                Condition::all()
                    .add(direct_message::Column::SenderEmail.eq(b))
                    .add(direct_message::Column::ReceiverEmail.eq(a)),
            );

        Ok(direct_message::Entity::find()
            .filter(between)
            .order_by_asc(direct_message::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(DirectMessage::from)
            .collect())
    }

    async fn mark_read(&self, id: Uuid, receiver: &str) -> Result<bool, RepositoryError> {
        let result = direct_message::Entity::update_many()
            .col_expr(direct_message::Column::IsRead, Expr::value(true))
            .filter(direct_message::Column::Id.eq(id))
            .filter(direct_message::Column::ReceiverEmail.eq(receiver))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn unread_count(&self, receiver: &str) -> Result<u64, RepositoryError> {
        Ok(direct_message::Entity::find()
            .filter(direct_message::Column::ReceiverEmail.eq(receiver))
            .filter(direct_message::Column::IsRead.eq(false))
            .count(self.db.as_ref())
            .await?)
    }
}
