// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// HTTP请求处理器模块
///
/// 包含各个API端点的具体处理逻辑，
/// 成功响应统一为 `{"success": true, "data": ...}`
pub mod admin_handler;
pub mod auth_handler;
pub mod generation_handler;
pub mod message_handler;
pub mod settings_handler;
pub mod topup_handler;

/// 包装成功响应
pub(crate) fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}
