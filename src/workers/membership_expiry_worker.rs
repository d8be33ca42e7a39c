// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::member_repository::MemberRepository;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 会员到期工作器
///
/// 定期把 `valid_until` 已过的 active 会员置为 inactive
pub struct MembershipExpiryWorker {
    members: Arc<dyn MemberRepository>,
    interval: Duration,
}

impl MembershipExpiryWorker {
    pub fn new(members: Arc<dyn MemberRepository>, interval: Duration) -> Self {
        Self {
            members,
            // 间隔为零时 tokio::time::interval 会 panic
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!(
            "Membership expiry worker started, checking every {:?}",
            self.interval
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }

    /// 执行一轮检查，返回本轮置为 inactive 的会员数
    pub async fn run_once(&self) -> u64 {
        match self.members.expire_memberships(Utc::now()).await {
            Ok(count) => {
                if count > 0 {
                    counter!("memberships_expired_total").increment(count);
                    info!("Deactivated {} expired memberships", count);
                }
                count
            }
            Err(e) => {
                error!("Failed to expire memberships: {}", e);
                0
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }
}

#[cfg(test)]
#[path = "membership_expiry_worker_test.rs"]
mod tests;
