//! Junction entity linking students groups and students (many-to-many).
//!
//! Raw membership rows are independent of student soft-deletion; only derived
//! counts and name listings filter out tombstoned students.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group membership database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_students")]
pub struct Model {
    /// Group side of the membership
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i64,
    /// Student side of the membership
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
}

/// Defines relationships between the junction and its two sides
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The group this membership belongs to
    #[sea_orm(
        belongs_to = "super::students_group::Entity",
        from = "Column::GroupId",
        to = "super::students_group::Column::Id",
        on_delete = "Cascade"
    )]
    Group,
    /// The student this membership belongs to
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::students_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
