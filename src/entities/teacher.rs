//! Teacher entity - Represents school teachers.
//!
//! Teachers own class groups and lessons and receive compensation tracked as
//! teacher payments. The `pix_key` is the payment-routing key used for payouts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employment status of a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum TeacherStatus {
    /// Currently teaching
    #[sea_orm(string_value = "active")]
    Active,
    /// No longer teaching
    #[sea_orm(string_value = "former")]
    Former,
}

impl TeacherStatus {
    /// Human-readable label for the status code.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Former => "Former",
        }
    }
}

/// Teacher database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    /// Unique identifier for the teacher
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name of the teacher
    pub name: String,
    /// PIX key for payments to the teacher
    pub pix_key: String,
    /// Current status of the teacher
    pub status: TeacherStatus,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Teacher and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One teacher owns many class groups
    #[sea_orm(has_many = "super::students_group::Entity")]
    Groups,
    /// One teacher conducts many lessons
    #[sea_orm(has_many = "super::lesson::Entity")]
    Lessons,
    /// One teacher receives many payments
    #[sea_orm(has_many = "super::teacher_payment::Entity")]
    Payments,
}

impl Related<super::students_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::lesson::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lessons.def()
    }
}

impl Related<super::teacher_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
