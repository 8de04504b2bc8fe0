//! Class group business logic - scheduling, membership, and live-member
//! projections.
//!
//! `max_students` is advisory: it is range-validated on write, but adding
//! members past the limit is not rejected. Membership rows are independent of
//! student soft-deletion; the derived count and name listing only see live
//! students.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::JoinType;
use sea_orm::{
    DatabaseConnection, PaginatorTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{
    GroupStudent, Student, StudentsGroup, Teacher, group_student, student, students_group,
};
use crate::errors::{Error, Result};

const MIN_CAPACITY: i32 = 1;
const MAX_CAPACITY: i32 = 50;

fn validate_capacity(max_students: i32) -> Result<()> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&max_students) {
        return Err(Error::Validation {
            field: "max_students",
            message: format!(
                "Ensure this value is between {MIN_CAPACITY} and {MAX_CAPACITY}."
            ),
        });
    }
    Ok(())
}

async fn validate_students_exist(db: &DatabaseConnection, student_ids: &[i64]) -> Result<()> {
    for &student_id in student_ids {
        if lifecycle::get_active::<Student>(db, student_id)
            .await?
            .is_none()
        {
            return Err(Error::InvalidReference {
                field: "students",
                id: student_id,
            });
        }
    }
    Ok(())
}

/// Creates a class group with its initial membership in one transaction.
pub async fn create_group(
    db: &DatabaseConnection,
    scheduled_at: DateTime<Utc>,
    teacher_id: i64,
    max_students: i32,
    student_ids: Vec<i64>,
) -> Result<students_group::Model> {
    validate_capacity(max_students)?;
    if lifecycle::get_active::<Teacher>(db, teacher_id)
        .await?
        .is_none()
    {
        return Err(Error::InvalidReference {
            field: "teacher",
            id: teacher_id,
        });
    }
    validate_students_exist(db, &student_ids).await?;

    let txn = db.begin().await?;

    let now = Utc::now();
    let group = students_group::ActiveModel {
        scheduled_at: Set(scheduled_at),
        teacher_id: Set(teacher_id),
        max_students: Set(max_students),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let group = group.insert(&txn).await?;

    for student_id in student_ids {
        let membership = group_student::ActiveModel {
            group_id: Set(group.id),
            student_id: Set(student_id),
        };
        membership.insert(&txn).await?;
    }

    txn.commit().await?;
    info!(
        "Created group {} (teacher {}) at {}",
        group.id, teacher_id, group.scheduled_at
    );
    Ok(group)
}

/// Finds a live group by id.
pub async fn get_group(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<students_group::Model>> {
    lifecycle::get_active::<StudentsGroup>(db, id).await
}

/// Optional field updates for an existing group.
#[derive(Debug, Default)]
pub struct GroupChanges {
    /// New schedule, if changing
    pub scheduled_at: Option<DateTime<Utc>>,
    /// New owning teacher, if changing
    pub teacher_id: Option<i64>,
    /// New advisory capacity, if changing
    pub max_students: Option<i32>,
    /// Replacement membership set, if changing
    pub student_ids: Option<Vec<i64>>,
}

/// Applies the provided field changes to a live group; when a membership set
/// is supplied it replaces the current one, all inside one transaction.
pub async fn update_group(
    db: &DatabaseConnection,
    id: i64,
    changes: GroupChanges,
) -> Result<students_group::Model> {
    let existing = get_group(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "students_group", id })?;

    if let Some(teacher_id) = changes.teacher_id {
        if lifecycle::get_active::<Teacher>(db, teacher_id)
            .await?
            .is_none()
        {
            return Err(Error::InvalidReference {
                field: "teacher",
                id: teacher_id,
            });
        }
    }
    if let Some(max_students) = changes.max_students {
        validate_capacity(max_students)?;
    }
    if let Some(ref student_ids) = changes.student_ids {
        validate_students_exist(db, student_ids).await?;
    }

    let txn = db.begin().await?;

    if let Some(student_ids) = changes.student_ids.clone() {
        GroupStudent::delete_many()
            .filter(group_student::Column::GroupId.eq(id))
            .exec(&txn)
            .await?;
        for student_id in student_ids {
            let membership = group_student::ActiveModel {
                group_id: Set(id),
                student_id: Set(student_id),
            };
            membership.insert(&txn).await?;
        }
    }

    let mut group: students_group::ActiveModel = existing.into();
    if let Some(scheduled_at) = changes.scheduled_at {
        group.scheduled_at = Set(scheduled_at);
    }
    if let Some(teacher_id) = changes.teacher_id {
        group.teacher_id = Set(teacher_id);
    }
    if let Some(max_students) = changes.max_students {
        group.max_students = Set(max_students);
    }
    group.updated_at = Set(Utc::now());
    let group = group.update(&txn).await?;

    txn.commit().await?;
    Ok(group)
}

/// Adds a student to a group; a no-op when the membership already exists.
///
/// Capacity is deliberately not checked here - `max_students` is advisory.
pub async fn add_student_to_group(
    db: &DatabaseConnection,
    group_id: i64,
    student_id: i64,
) -> Result<()> {
    if get_group(db, group_id).await?.is_none() {
        return Err(Error::NotFound {
            entity: "students_group",
            id: group_id,
        });
    }
    if lifecycle::get_active::<Student>(db, student_id)
        .await?
        .is_none()
    {
        return Err(Error::InvalidReference {
            field: "students",
            id: student_id,
        });
    }

    let already_member = GroupStudent::find()
        .filter(group_student::Column::GroupId.eq(group_id))
        .filter(group_student::Column::StudentId.eq(student_id))
        .one(db)
        .await?
        .is_some();
    if already_member {
        return Ok(());
    }

    let membership = group_student::ActiveModel {
        group_id: Set(group_id),
        student_id: Set(student_id),
    };
    membership.insert(db).await?;
    Ok(())
}

/// Removes a student from a group; a no-op when no membership exists.
pub async fn remove_student_from_group(
    db: &DatabaseConnection,
    group_id: i64,
    student_id: i64,
) -> Result<()> {
    GroupStudent::delete_many()
        .filter(group_student::Column::GroupId.eq(group_id))
        .filter(group_student::Column::StudentId.eq(student_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Number of live (non-tombstoned) students currently in the group.
///
/// Soft-deleted students keep their membership rows but never count here.
pub async fn current_students_count(db: &DatabaseConnection, group_id: i64) -> Result<u64> {
    GroupStudent::find()
        .filter(group_student::Column::GroupId.eq(group_id))
        .join(JoinType::InnerJoin, group_student::Relation::Student.def())
        .filter(student::Column::DeletedAt.is_null())
        .count(db)
        .await
        .map_err(Into::into)
}

/// Raw membership count, tombstoned students included.
pub async fn raw_membership_count(db: &DatabaseConnection, group_id: i64) -> Result<u64> {
    GroupStudent::find()
        .filter(group_student::Column::GroupId.eq(group_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Live member students of the group, ordered by name.
async fn live_members(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<Vec<student::Model>> {
    Student::find()
        .join(JoinType::InnerJoin, student::Relation::GroupStudents.def())
        .filter(group_student::Column::GroupId.eq(group_id))
        .filter(student::Column::DeletedAt.is_null())
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Display names of the live member students, for the read projection.
pub async fn student_names(db: &DatabaseConnection, group_id: i64) -> Result<Vec<String>> {
    Ok(live_members(db, group_id)
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect())
}

/// Ids of the live member students, for the wire representation.
pub async fn student_ids(db: &DatabaseConnection, group_id: i64) -> Result<Vec<i64>> {
    live_members(db, group_id)
        .await
        .map(|members| members.into_iter().map(|s| s.id).collect())
}

/// Textual summary of a group, used by the lesson read projection.
///
/// Resolves through tombstones so a lesson of a deleted group still renders.
pub async fn group_info(db: &DatabaseConnection, group_id: i64) -> Result<String> {
    let Some(group) = lifecycle::get_any::<StudentsGroup>(db, group_id).await? else {
        return Ok(String::new());
    };
    let teacher_name = crate::core::teacher::teacher_name(db, group.teacher_id).await?;
    Ok(format!("Group with {} at {}", teacher_name, group.scheduled_at))
}
