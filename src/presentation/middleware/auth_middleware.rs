// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::services::auth_service::{AuthService, Session};
use crate::presentation::errors::{AppError, RequestError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// 认证中间件
///
/// 校验 `Authorization: Bearer <token>` 会话令牌，
/// 成功后把 [`Session`] 注入请求扩展
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(AppError)` - 缺少或无效的令牌（401），会员账户不可用（403）
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!("AuthMiddleware processing path: {}", req.uri().path());

    let token = bearer_token(req.headers()).ok_or(RequestError::Unauthorized)?;
    let session = state.auth.authenticate(token).await?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

/// 管理员中间件，需位于认证中间件之后
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    match req.extensions().get::<Session>() {
        Some(session) if session.is_admin() => Ok(next.run(req).await),
        Some(session) => {
            debug!("Admin route refused for {}", session.email);
            Err(RequestError::Forbidden.into())
        }
        None => Err(RequestError::Unauthorized.into()),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
