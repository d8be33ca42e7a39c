// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::member::{Member, MemberFilter, MemberStatus, MemberUpdate};
use crate::domain::repositories::member_repository::{MemberRepository, RepositoryError};
use crate::domain::repositories::topup_repository::TopupRepository;
use crate::domain::services::credit_ledger::{CreditLedger, LedgerError};
use crate::utils::validators::normalize_email;
use serde::Serialize;
use std::fmt::Write;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// 管理员操作错误
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    #[error("Invalid member update: {0}")]
    InvalidUpdate(String),
    #[error("Failed to serialize export: {0}")]
    Export(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unsupported export format: {}", other)),
        }
    }
}

/// 导出结果
#[derive(Debug, Clone)]
pub struct MemberExport {
    pub content_type: &'static str,
    pub filename: String,
    pub body: String,
}

/// 后台统计
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminStats {
    pub members_total: u64,
    pub active: u64,
    pub inactive: u64,
    pub pending: u64,
    pub pending_topups: u64,
}

/// 会员管理服务
pub struct AdminService {
    members: Arc<dyn MemberRepository>,
    topups: Arc<dyn TopupRepository>,
    ledger: Arc<CreditLedger>,
}

impl AdminService {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        topups: Arc<dyn TopupRepository>,
        ledger: Arc<CreditLedger>,
    ) -> Self {
        Self {
            members,
            topups,
            ledger,
        }
    }

    pub async fn list_members(&self, filter: &MemberFilter) -> Result<Vec<Member>, AdminError> {
        let mut filter = filter.clone();
        filter.search = filter
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        Ok(self.members.list(&filter).await?)
    }

    pub async fn get_member(&self, email: &str) -> Result<Member, AdminError> {
        let email = normalize_email(email);
        self.members
            .find_by_email(&email)
            .await?
            .ok_or(AdminError::MemberNotFound(email))
    }

    /// 修改会员资料；`credits` 不为空时直接覆盖余额
    pub async fn update_member(
        &self,
        email: &str,
        update: &MemberUpdate,
        credits: Option<i64>,
    ) -> Result<Member, AdminError> {
        let email = normalize_email(email);
        if update
            .full_name
            .as_deref()
            .is_some_and(|n| n.trim().is_empty())
        {
            return Err(AdminError::InvalidUpdate(
                "full_name cannot be empty".to_string(),
            ));
        }

        let mut update = update.clone();
        update.full_name = update.full_name.map(|n| n.trim().to_string());

        let mut member = match self.members.update_profile(&email, &update).await {
            Ok(member) => member,
            Err(RepositoryError::NotFound) => return Err(AdminError::MemberNotFound(email)),
            Err(e) => return Err(e.into()),
        };

        if let Some(credits) = credits {
            member.credits = self.ledger.set_balance(&email, credits).await?;
        }

        info!("Member {} updated by admin", email);
        Ok(member)
    }

    pub async fn delete_member(&self, email: &str) -> Result<(), AdminError> {
        let email = normalize_email(email);
        if !self.members.delete(&email).await? {
            return Err(AdminError::MemberNotFound(email));
        }
        info!("Member {} deleted", email);
        Ok(())
    }

    /// 手动加积分，返回新余额
    pub async fn add_credits(&self, email: &str, amount: i64) -> Result<i64, AdminError> {
        let email = normalize_email(email);
        match self.ledger.credit(&email, amount).await {
            Ok(balance) => Ok(balance),
            Err(LedgerError::MemberNotFound(email)) => Err(AdminError::MemberNotFound(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// 导出全部会员
    pub async fn export_members(&self, format: ExportFormat) -> Result<MemberExport, AdminError> {
        let members = self.members.list(&MemberFilter::default()).await?;
        let stamp = chrono::Utc::now().format("%Y%m%d");

        let export = match format {
            ExportFormat::Csv => MemberExport {
                content_type: "text/csv; charset=utf-8",
                filename: format!("members-{}.csv", stamp),
                body: members_to_csv(&members),
            },
            ExportFormat::Json => MemberExport {
                content_type: "application/json",
                filename: format!("members-{}.json", stamp),
                body: serde_json::to_string_pretty(&members)
                    .map_err(|e| AdminError::Export(e.to_string()))?,
            },
        };
        info!("Exported {} members as {:?}", members.len(), format);
        Ok(export)
    }

    pub async fn stats(&self) -> Result<AdminStats, AdminError> {
        let mut stats = AdminStats::default();
        for (status, count) in self.members.count_by_status().await? {
            stats.members_total += count;
            match status {
                MemberStatus::Active => stats.active = count,
                MemberStatus::Inactive => stats.inactive = count,
                MemberStatus::Pending => stats.pending = count,
            }
        }
        stats.pending_topups = self.topups.count_pending().await?;
        Ok(stats)
    }
}

const CSV_HEADER: &str = "email,full_name,status,credits,valid_until,created_at,last_seen";

fn members_to_csv(members: &[Member]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for m in members {
        // 写入 String 不会失败
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{}",
            csv_field(&m.email),
            csv_field(&m.full_name),
            m.status,
            m.credits,
            m.valid_until.map(|t| t.to_rfc3339()).unwrap_or_default(),
            m.created_at.to_rfc3339(),
            m.last_seen.map(|t| t.to_rfc3339()).unwrap_or_default(),
        );
    }
    out
}

/// 含逗号、引号或换行的字段加引号，内部引号双写
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
