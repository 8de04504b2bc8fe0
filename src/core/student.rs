//! Student business logic.

use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{Student, StudentStatus, student};
use crate::errors::{Error, Result};

/// Creates a new student record.
pub async fn create_student(
    db: &DatabaseConnection,
    name: String,
    birth_date: NaiveDate,
    extra_info: Option<String>,
    status: StudentStatus,
) -> Result<student::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "This field may not be blank.".to_string(),
        });
    }

    let now = Utc::now();
    let student = student::ActiveModel {
        name: Set(name),
        birth_date: Set(birth_date),
        extra_info: Set(extra_info),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = student.insert(db).await?;
    info!("Created student '{}' (ID: {})", result.name, result.id);
    Ok(result)
}

/// Finds a live student by id.
pub async fn get_student(db: &DatabaseConnection, id: i64) -> Result<Option<student::Model>> {
    lifecycle::get_active::<Student>(db, id).await
}

/// Display name of a student for read projections, tolerating tombstones.
pub async fn student_name(db: &DatabaseConnection, id: i64) -> Result<String> {
    Ok(lifecycle::get_any::<Student>(db, id)
        .await?
        .map(|s| s.name)
        .unwrap_or_default())
}

/// Optional field updates for an existing student.
#[derive(Debug, Default)]
pub struct StudentChanges {
    /// New name, if changing
    pub name: Option<String>,
    /// New birth date, if changing
    pub birth_date: Option<NaiveDate>,
    /// New free-text notes, if changing
    pub extra_info: Option<String>,
    /// New status, if changing
    pub status: Option<StudentStatus>,
}

/// Applies the provided field changes to a live student and refreshes
/// `updated_at`.
pub async fn update_student(
    db: &DatabaseConnection,
    id: i64,
    changes: StudentChanges,
) -> Result<student::Model> {
    let existing = get_student(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "student", id })?;

    let mut student: student::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation {
                field: "name",
                message: "This field may not be blank.".to_string(),
            });
        }
        student.name = Set(name);
    }
    if let Some(birth_date) = changes.birth_date {
        student.birth_date = Set(birth_date);
    }
    if let Some(extra_info) = changes.extra_info {
        student.extra_info = Set(Some(extra_info));
    }
    if let Some(status) = changes.status {
        student.status = Set(status);
    }

    student.updated_at = Set(Utc::now());
    student.update(db).await.map_err(Into::into)
}
