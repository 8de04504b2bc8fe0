//! Lesson entity - Represents an individual class session.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lesson database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lessons")]
pub struct Model {
    /// Unique identifier for the lesson
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Group this lesson belongs to
    #[serde(rename = "students_group")]
    pub students_group_id: i64,
    /// Teacher who conducted the lesson
    #[serde(rename = "teacher")]
    pub teacher_id: i64,
    /// Date and time when the lesson took place
    pub occurred_at: DateTimeUtc,
    /// Notes about the lesson content or student performance
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Lesson and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each lesson belongs to one group
    #[sea_orm(
        belongs_to = "super::students_group::Entity",
        from = "Column::StudentsGroupId",
        to = "super::students_group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
    /// Each lesson belongs to one teacher
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
}

impl Related<super::students_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
