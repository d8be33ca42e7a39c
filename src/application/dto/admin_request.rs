// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::member::{MemberFilter, MemberStatus, MemberUpdate};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct MemberListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl MemberListQuery {
    pub fn into_filter(self) -> Result<MemberFilter, String> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<MemberStatus>)
            .transpose()?;

        Ok(MemberFilter {
            status,
            search: self.search,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// 修改会员，未出现的字段保持不变
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMemberRequestDto {
    #[serde(flatten)]
    pub update: MemberUpdate,
    #[validate(range(min = 0, message = "Credits cannot be negative"))]
    pub credits: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCreditsRequestDto {
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PutSettingRequestDto {
    #[validate(length(max = 4000))]
    pub value: String,
}
