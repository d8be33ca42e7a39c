// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::member_repository::RepositoryError;
use crate::domain::models::setting::SystemSetting;
use async_trait::async_trait;

/// 键值配置仓库特质
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn all(&self) -> Result<Vec<SystemSetting>, RepositoryError>;
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError>;
    /// 不存在则插入，存在则覆盖
    async fn put(&self, key: &str, value: &str) -> Result<SystemSetting, RepositoryError>;
}
