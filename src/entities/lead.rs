//! Lead entity - Represents potential students or customers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lead database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    /// Unique identifier for the lead
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name of the lead
    pub name: String,
    /// Goals and objectives of the lead
    #[sea_orm(column_type = "Text")]
    pub goals: String,
    /// Date of birth of the lead
    pub birth_date: Date,
    /// Areas of interest or specific courses the lead is interested in
    #[sea_orm(column_type = "Text", nullable)]
    pub interests: Option<String>,
    /// Email address of the lead
    pub email: Option<String>,
    /// Phone number of the lead
    pub phone: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Leads reference no other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
