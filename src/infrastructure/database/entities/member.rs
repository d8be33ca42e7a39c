// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub status: String,
    pub credits: i64,
    pub valid_until: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub last_seen: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::topup_request::Entity")]
    TopupRequests,
}

impl Related<super::topup_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TopupRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
