//! Students group entity - Represents a class with scheduled lessons.
//!
//! A group is owned by one teacher and holds many students through the
//! `group_students` junction. `max_students` is advisory capacity metadata:
//! it is range-validated on write but membership adds are never rejected.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Students group database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students_groups")]
pub struct Model {
    /// Unique identifier for the group
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Scheduled date and time for the group lessons
    pub scheduled_at: DateTimeUtc,
    /// Teacher assigned to this group
    #[serde(rename = "teacher")]
    pub teacher_id: i64,
    /// Maximum number of students allowed in this group (1-50)
    pub max_students: i32,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between StudentsGroup and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each group belongs to one teacher
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
    /// One group hosts many lessons
    #[sea_orm(has_many = "super::lesson::Entity")]
    Lessons,
    /// Junction rows linking this group to its students
    #[sea_orm(has_many = "super::group_student::Entity")]
    GroupStudents,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::lesson::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lessons.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        super::group_student::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::group_student::Relation::Group.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
