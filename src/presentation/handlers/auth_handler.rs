// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::auth_request::{LoginRequestDto, SignupRequestDto};
use crate::domain::services::auth_service::{AuthService, Session};
use crate::presentation::errors::AppError;
use crate::presentation::handlers::success;
use axum::{http::StatusCode, Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use validator::Validate;

/// 注册，新账号处于待审核状态
pub async fn signup(
    Extension(auth): Extension<Arc<AuthService>>,
    Json(request): Json<SignupRequestDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request.validate()?;

    let member = auth
        .signup(&request.email, &request.full_name, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        success(json!({
            "member": member,
            "message": "Account created and waiting for admin approval",
        })),
    ))
}

/// 登录并签发会话令牌
pub async fn login(
    Extension(auth): Extension<Arc<AuthService>>,
    Json(request): Json<LoginRequestDto>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let issued = auth.login(&request.email, &request.password).await?;
    Ok(success(issued))
}

/// 当前会话信息
pub async fn me(
    session: Session,
    Extension(auth): Extension<Arc<AuthService>>,
) -> Result<Json<Value>, AppError> {
    let member = auth.me(&session).await?;
    Ok(success(json!({
        "email": session.email,
        "role": session.role,
        "member": member,
    })))
}

pub async fn heartbeat(
    session: Session,
    Extension(auth): Extension<Arc<AuthService>>,
) -> Result<Json<Value>, AppError> {
    auth.heartbeat(&session).await?;
    Ok(success(json!({ "email": session.email })))
}
