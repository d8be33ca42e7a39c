// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::topup_request::{
    CheckoutRequestDto, ConfirmTopupRequestDto, CreateTopupRequestDto, TopupListQuery,
};
use crate::domain::models::topup::TopupStatus;
use crate::domain::services::auth_service::Session;
use crate::domain::services::topup_service::TopupService;
use crate::presentation::errors::AppError;
use crate::presentation::handlers::success;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 附收据的人工充值申请
pub async fn create_request(
    session: Session,
    Extension(topups): Extension<Arc<TopupService>>,
    Json(request): Json<CreateTopupRequestDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request.validate()?;
    let created = topups
        .create_request(
            &session,
            request.amount,
            request.price,
            request.receipt_url.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, success(created)))
}

/// 通过支付网关结账
pub async fn checkout(
    session: Session,
    Extension(topups): Extension<Arc<TopupService>>,
    Json(request): Json<CheckoutRequestDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request.validate()?;
    let checkout = topups.checkout(&session, request.amount).await?;
    Ok((StatusCode::CREATED, success(checkout)))
}

/// 支付完成后确认
pub async fn confirm(
    session: Session,
    Extension(topups): Extension<Arc<TopupService>>,
    Json(request): Json<ConfirmTopupRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let confirmed = topups
        .confirm(&session, request.tid.trim(), request.token.trim())
        .await?;
    Ok(success(confirmed))
}

pub async fn list_mine(
    session: Session,
    Extension(topups): Extension<Arc<TopupService>>,
) -> Result<Json<Value>, AppError> {
    Ok(success(topups.list_mine(&session).await?))
}

pub async fn list(
    Extension(topups): Extension<Arc<TopupService>>,
    Query(query): Query<TopupListQuery>,
) -> Result<Json<Value>, AppError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<TopupStatus>)
        .transpose()
        .map_err(AppError::bad_request)?;
    Ok(success(topups.list(status).await?))
}

pub async fn approve(
    Extension(topups): Extension<Arc<TopupService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    Ok(success(topups.approve(id).await?))
}

pub async fn reject(
    Extension(topups): Extension<Arc<TopupService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    Ok(success(topups.reject(id).await?))
}
