//! Student entity - Represents enrolled students.
//!
//! Students hold enrollment contracts and belong to class groups through the
//! `group_students` junction table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// Currently enrolled
    #[sea_orm(string_value = "active")]
    Active,
    /// No longer enrolled
    #[sea_orm(string_value = "former")]
    Former,
}

impl StudentStatus {
    /// Human-readable label for the status code.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Former => "Former",
        }
    }
}

/// Student database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name of the student
    pub name: String,
    /// Date of birth of the student
    pub birth_date: Date,
    /// Additional free-text information about the student
    #[sea_orm(column_type = "Text", nullable)]
    pub extra_info: Option<String>,
    /// Current status of the student
    pub status: StudentStatus,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One student holds many enrollment contracts
    #[sea_orm(has_many = "super::contract::Entity")]
    Contracts,
    /// Junction rows linking this student to class groups
    #[sea_orm(has_many = "super::group_student::Entity")]
    GroupStudents,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl Related<super::students_group::Entity> for Entity {
    fn to() -> RelationDef {
        super::group_student::Relation::Group.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::group_student::Relation::Student.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
