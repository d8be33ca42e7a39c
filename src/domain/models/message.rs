// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 站内私信
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub sender_email: String,
    pub receiver_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

impl DirectMessage {
    pub fn new(sender_email: String, receiver_email: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_email,
            receiver_email,
            content,
            created_at: Utc::now(),
            is_read: false,
        }
    }
}
