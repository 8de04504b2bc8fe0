//! Teacher payment entity - Tracks teacher compensation.
//!
//! Same shape as a school payment plus the owning teacher; rows are removed
//! by the database cascade when their teacher is hard-deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::payment::PaymentMethod;

/// Teacher payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher_payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Teacher who received the payment
    #[serde(rename = "teacher")]
    pub teacher_id: i64,
    /// Amount paid to the teacher in local currency (minimum 0.01)
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub value: Decimal,
    /// Timestamp when the payment was completed
    pub paid_at: DateTimeUtc,
    /// Method used for the payment
    pub payment_method: PaymentMethod,
    /// Description or reference for the payment
    pub description: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between TeacherPayment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one teacher
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
