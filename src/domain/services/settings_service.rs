// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::setting::{Feature, SystemSetting};
use crate::domain::repositories::member_repository::RepositoryError;
use crate::domain::repositories::settings_repository::SettingsRepository;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// 系统配置服务
///
/// 封装 settings 表的读写，并提供按功能查询单价的能力。
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    pub async fn all(&self) -> Result<Vec<SystemSetting>, RepositoryError> {
        self.repo.all().await
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        self.repo.get(key).await
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<SystemSetting, RepositoryError> {
        self.repo.put(key.trim(), value.trim()).await
    }

    /// 查询功能单价，缺失或无法解析时使用默认值
    pub async fn cost_of(&self, feature: Feature) -> Result<i64, RepositoryError> {
        let raw = self.repo.get(feature.cost_key()).await?;
        Ok(parse_cost(feature, raw.as_deref()))
    }

    /// 全部功能的当前单价
    pub async fn price_list(&self) -> Result<BTreeMap<String, i64>, RepositoryError> {
        let stored: BTreeMap<String, String> = self
            .repo
            .all()
            .await?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect();

        Ok(Feature::ALL
            .iter()
            .map(|f| {
                let raw = stored.get(f.cost_key()).map(String::as_str);
                (f.to_string(), parse_cost(*f, raw))
            })
            .collect())
    }
}

fn parse_cost(feature: Feature, raw: Option<&str>) -> i64 {
    match raw.map(|v| v.trim().parse::<i64>()) {
        Some(Ok(cost)) if cost >= 0 => cost,
        Some(_) => {
            warn!(
                "Invalid value for {}, falling back to {}",
                feature.cost_key(),
                feature.default_cost()
            );
            feature.default_cost()
        }
        None => feature.default_cost(),
    }
}
