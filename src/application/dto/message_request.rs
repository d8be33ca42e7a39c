// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequestDto {
    /// 会员可省略，默认发给管理员
    pub to: Option<String>,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub with: String,
}
