// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};
use std::sync::Arc;

use crate::domain::{
    models::setting::SystemSetting,
    repositories::{member_repository::RepositoryError, settings_repository::SettingsRepository},
};
use crate::infrastructure::database::entities::setting;

pub struct SettingsRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl SettingsRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsRepository for SettingsRepositoryImpl {
    async fn all(&self) -> Result<Vec<SystemSetting>, RepositoryError> {
        Ok(setting::Entity::find()
            .order_by_asc(setting::Column::Key)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|m| SystemSetting {
                key: m.key,
                value: m.value,
            })
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(setting::Entity::find_by_id(key.to_string())
            .one(self.db.as_ref())
            .await?
            .map(|m| m.value))
    }

    async fn put(&self, key: &str, value: &str) -> Result<SystemSetting, RepositoryError> {
        let model = setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
        };

        setting::Entity::insert(model)
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .update_column(setting::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(SystemSetting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
