use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum WinnerCategory {
    /// Free access spot
    #[sea_orm(string_value = "winner")]
    Winner,
    #[sea_orm(string_value = "reserve")]
    Reserve,
}

impl std::fmt::Display for WinnerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinnerCategory::Winner => write!(f, "winner"),
            WinnerCategory::Reserve => write!(f, "reserve"),
        }
    }
}

/// Draw result row. Written once by the draw executor and never edited;
/// student names are copied from the consumed registration.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub draw_time: i64,
    pub category: WinnerCategory,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
