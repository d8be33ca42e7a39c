// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::message_request::{ConversationQuery, SendMessageRequestDto};
use crate::domain::services::auth_service::Session;
use crate::domain::services::message_service::MessageService;
use crate::presentation::errors::AppError;
use crate::presentation::handlers::success;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub async fn send(
    session: Session,
    Extension(messages): Extension<Arc<MessageService>>,
    Json(request): Json<SendMessageRequestDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request.validate()?;
    let message = messages
        .send(&session, request.to.as_deref(), &request.content)
        .await?;
    Ok((StatusCode::CREATED, success(message)))
}

pub async fn inbox(
    session: Session,
    Extension(messages): Extension<Arc<MessageService>>,
) -> Result<Json<Value>, AppError> {
    Ok(success(messages.inbox(&session).await?))
}

pub async fn conversation(
    session: Session,
    Extension(messages): Extension<Arc<MessageService>>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Value>, AppError> {
    Ok(success(messages.conversation(&session, &query.with).await?))
}

pub async fn mark_read(
    session: Session,
    Extension(messages): Extension<Arc<MessageService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    messages.mark_read(&session, id).await?;
    Ok(success(json!({ "id": id, "is_read": true })))
}

pub async fn unread_count(
    session: Session,
    Extension(messages): Extension<Arc<MessageService>>,
) -> Result<Json<Value>, AppError> {
    let unread = messages.unread_count(&session).await?;
    Ok(success(json!({ "unread": unread })))
}
