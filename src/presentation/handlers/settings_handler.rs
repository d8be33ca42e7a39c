// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::admin_request::PutSettingRequestDto;
use crate::domain::services::auth_service::Session;
use crate::domain::services::settings_service::SettingsService;
use crate::presentation::errors::AppError;
use crate::presentation::handlers::success;
use axum::{extract::Path, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub async fn list(
    Extension(settings): Extension<Arc<SettingsService>>,
) -> Result<Json<Value>, AppError> {
    Ok(success(settings.all().await?))
}

pub async fn get(
    _session: Session,
    Extension(settings): Extension<Arc<SettingsService>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let value = settings.get(&key).await?;
    Ok(success(json!({ "key": key, "value": value })))
}

pub async fn put(
    session: Session,
    Extension(settings): Extension<Arc<SettingsService>>,
    Path(key): Path<String>,
    Json(request): Json<PutSettingRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    if key.trim().is_empty() {
        return Err(AppError::bad_request("Setting key cannot be empty"));
    }
    let saved = settings.put(&key, &request.value).await?;
    info!("Setting {} updated by {}", saved.key, session.email);
    Ok(success(saved))
}
