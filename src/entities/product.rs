//! Product entity - Represents courses or services offered by the school.
//!
//! Products are what students enroll in through contracts. Each product has a
//! price, a duration in months, and an availability flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product or course
    pub name: String,
    /// Detailed description of the product
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Price of the product in local currency
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    /// Duration of the product in months
    pub duration_months: i32,
    /// Whether the product is currently available for enrollment
    pub is_active: bool,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product is referenced by many enrollment contracts
    #[sea_orm(has_many = "super::contract::Entity")]
    Contracts,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
