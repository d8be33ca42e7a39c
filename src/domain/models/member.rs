// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 会员状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
    Pending,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
            MemberStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            "pending" => Ok(MemberStatus::Pending),
            other => Err(format!("unknown member status: {}", other)),
        }
    }
}

/// 会员实体
///
/// 邮箱是主键，始终以小写形式保存。积分余额只能通过积分账本修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: MemberStatus,
    pub credits: i64,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl Member {
    /// 创建一个待审核的新会员
    pub fn new(email: String, full_name: String, password_hash: String, credits: i64) -> Self {
        Self {
            email,
            full_name,
            password_hash,
            status: MemberStatus::Pending,
            credits,
            valid_until: None,
            created_at: Utc::now(),
            last_seen: None,
        }
    }

    /// 会员资格是否已过期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until <= now)
    }

    /// 能否登录：状态为 active 且未过期
    pub fn can_sign_in(&self, now: DateTime<Utc>) -> bool {
        self.status == MemberStatus::Active && !self.is_expired(now)
    }
}

/// 会员列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub status: Option<MemberStatus>,
    /// 按邮箱或姓名模糊搜索
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// 管理员对会员资料的修改，字段为 None 表示不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberUpdate {
    pub full_name: Option<String>,
    pub status: Option<MemberStatus>,
    /// `Some(None)` 表示清除到期时间
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub valid_until: Option<Option<DateTime<Utc>>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer).map(Some)
    }
}
