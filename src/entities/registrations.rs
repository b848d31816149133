use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pending sign-up for an upcoming weekly draw.
/// (student_id, draw_time) is unique; rows are consumed when the draw for
/// draw_time executes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub submitted_at: DateTime<Utc>,
    /// Unix seconds of the Monday 05:00 boundary this entry is drawn at
    pub draw_time: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
