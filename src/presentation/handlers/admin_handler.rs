// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::admin_request::{
    AddCreditsRequestDto, ExportQuery, MemberListQuery, UpdateMemberRequestDto,
};
use crate::domain::services::admin_service::{AdminService, ExportFormat};
use crate::presentation::errors::AppError;
use crate::presentation::handlers::success;
use axum::{
    extract::{Path, Query},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use validator::Validate;

pub async fn list_members(
    Extension(admin): Extension<Arc<AdminService>>,
    Query(query): Query<MemberListQuery>,
) -> Result<Json<Value>, AppError> {
    query.validate()?;
    let filter = query.into_filter().map_err(AppError::bad_request)?;
    Ok(success(admin.list_members(&filter).await?))
}

pub async fn get_member(
    Extension(admin): Extension<Arc<AdminService>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(success(admin.get_member(&email).await?))
}

pub async fn update_member(
    Extension(admin): Extension<Arc<AdminService>>,
    Path(email): Path<String>,
    Json(request): Json<UpdateMemberRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let member = admin
        .update_member(&email, &request.update, request.credits)
        .await?;
    Ok(success(member))
}

pub async fn delete_member(
    Extension(admin): Extension<Arc<AdminService>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    admin.delete_member(&email).await?;
    Ok(success(json!({ "deleted": email })))
}

pub async fn add_credits(
    Extension(admin): Extension<Arc<AdminService>>,
    Path(email): Path<String>,
    Json(request): Json<AddCreditsRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let balance = admin.add_credits(&email, request.amount).await?;
    Ok(success(json!({ "email": email, "credits": balance })))
}

/// 导出会员，默认 CSV
pub async fn export_members(
    Extension(admin): Extension<Arc<AdminService>>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format = query
        .format
        .as_deref()
        .unwrap_or("csv")
        .parse::<ExportFormat>()
        .map_err(AppError::bad_request)?;

    let export = admin.export_members(format).await?;
    let disposition = format!("attachment; filename=\"{}\"", export.filename);

    Ok((
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

pub async fn stats(
    Extension(admin): Extension<Arc<AdminService>>,
) -> Result<Json<Value>, AppError> {
    Ok(success(admin.stats().await?))
}
