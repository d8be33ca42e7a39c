// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::NotificationSettings;
use crate::domain::services::notification_service::{NoopNotifier, Notifier};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 通过机器人接口向管理员会话发送通知
pub struct TelegramNotifier {
    /// HTTP 客户端
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(api_base_url: &str, bot_token: &str, chat_id: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                api_base_url.trim_end_matches('/'),
                bot_token
            ),
            chat_id: chat_id.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        let result = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "chat_id": self.chat_id, "text": text }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("Admin notification rejected with status {}: {}", status, body);
            }
            Err(e) => warn!("Admin notification failed: {}", e),
        }
    }
}

/// 按配置选择通知实现，令牌或会话ID为空时不发送
pub fn build_notifier(settings: &NotificationSettings) -> Arc<dyn Notifier> {
    let token = settings.telegram_bot_token.trim();
    let chat_id = settings.telegram_chat_id.trim();

    if token.is_empty() || chat_id.is_empty() {
        info!("Admin notifications disabled");
        return Arc::new(NoopNotifier);
    }
    Arc::new(TelegramNotifier::new(&settings.api_base_url, token, chat_id))
}
