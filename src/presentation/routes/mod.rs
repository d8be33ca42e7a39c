// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::app::AppServices;
use crate::presentation::handlers::{
    admin_handler, auth_handler, generation_handler, message_handler, settings_handler,
    topup_handler,
};
use crate::presentation::middleware::auth_middleware::{auth_middleware, require_admin, AuthState};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Extension, Router,
};

/// 创建应用路由
///
/// 公开路由无需认证；其余路由经过会话认证，
/// `/v1/admin` 下的路由额外要求管理员身份
///
/// # 参数
///
/// * `services` - 已装配的服务集合
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(services: &AppServices) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/v1/auth/signup", post(auth_handler::signup))
        .route("/v1/auth/login", post(auth_handler::login));

    let admin_routes = Router::new()
        .route("/v1/admin/members", get(admin_handler::list_members))
        .route(
            "/v1/admin/members/{email}",
            get(admin_handler::get_member)
                .patch(admin_handler::update_member)
                .delete(admin_handler::delete_member),
        )
        .route(
            "/v1/admin/members/{email}/credits",
            post(admin_handler::add_credits),
        )
        .route("/v1/admin/export/members", get(admin_handler::export_members))
        .route("/v1/admin/stats", get(admin_handler::stats))
        .route("/v1/admin/topups", get(topup_handler::list))
        .route("/v1/admin/topups/{id}/approve", post(topup_handler::approve))
        .route("/v1/admin/topups/{id}/reject", post(topup_handler::reject))
        .route("/v1/admin/settings", get(settings_handler::list))
        .route(
            "/v1/admin/settings/{key}",
            axum::routing::put(settings_handler::put),
        )
        .layer(middleware::from_fn(require_admin));

    // 图片与音频以 base64 内联上传，放宽默认的 2 MB 请求体限制
    let generation_routes = Router::new()
        .route("/v1/generate/chat", post(generation_handler::chat))
        .route("/v1/generate/image", post(generation_handler::image))
        .route("/v1/generate/outpaint", post(generation_handler::outpaint))
        .route("/v1/generate/video", post(generation_handler::video))
        .route("/v1/generate/speech", post(generation_handler::speech))
        .route(
            "/v1/generate/voice-clone",
            post(generation_handler::voice_clone),
        )
        .route(
            "/v1/generate/storyboard",
            post(generation_handler::storyboard),
        )
        .layer(DefaultBodyLimit::max(services.upload_limit));

    let protected_routes = Router::new()
        .route("/v1/me", get(auth_handler::me))
        .route("/v1/me/heartbeat", post(auth_handler::heartbeat))
        .route("/v1/prices", get(generation_handler::prices))
        .route(
            "/v1/topups",
            get(topup_handler::list_mine).post(topup_handler::create_request),
        )
        .route("/v1/topups/checkout", post(topup_handler::checkout))
        .route("/v1/topups/confirm", post(topup_handler::confirm))
        .route(
            "/v1/messages",
            get(message_handler::inbox).post(message_handler::send),
        )
        .route("/v1/messages/unread-count", get(message_handler::unread_count))
        .route("/v1/messages/conversation", get(message_handler::conversation))
        .route("/v1/messages/{id}/read", post(message_handler::mark_read))
        .route("/v1/settings/{key}", get(settings_handler::get))
        .merge(generation_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            AuthState {
                auth: services.auth.clone(),
            },
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(services.auth.clone()))
        .layer(Extension(services.generation.clone()))
        .layer(Extension(services.topups.clone()))
        .layer(Extension(services.messages.clone()))
        .layer(Extension(services.admin.clone()))
        .layer(Extension(services.settings.clone()))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
