// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

/// 管理员通知特质
///
/// 通知失败只记录日志，不影响触发通知的业务操作。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str);
}

/// 未配置通知渠道时使用
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, text: &str) {
        tracing::debug!("Notification dropped (no channel configured): {}", text);
    }
}
