//! Teacher business logic.

use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{Teacher, TeacherStatus, teacher};
use crate::errors::{Error, Result};

/// Creates a new teacher record.
pub async fn create_teacher(
    db: &DatabaseConnection,
    name: String,
    pix_key: String,
    status: TeacherStatus,
) -> Result<teacher::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "This field may not be blank.".to_string(),
        });
    }
    if pix_key.trim().is_empty() {
        return Err(Error::Validation {
            field: "pix_key",
            message: "This field may not be blank.".to_string(),
        });
    }

    let now = Utc::now();
    let teacher = teacher::ActiveModel {
        name: Set(name),
        pix_key: Set(pix_key),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = teacher.insert(db).await?;
    info!("Created teacher '{}' (ID: {})", result.name, result.id);
    Ok(result)
}

/// Finds a live teacher by id.
pub async fn get_teacher(db: &DatabaseConnection, id: i64) -> Result<Option<teacher::Model>> {
    lifecycle::get_active::<Teacher>(db, id).await
}

/// Display name of a teacher for read projections, tolerating tombstones.
pub async fn teacher_name(db: &DatabaseConnection, id: i64) -> Result<String> {
    Ok(lifecycle::get_any::<Teacher>(db, id)
        .await?
        .map(|t| t.name)
        .unwrap_or_default())
}

/// Optional field updates for an existing teacher.
#[derive(Debug, Default)]
pub struct TeacherChanges {
    /// New name, if changing
    pub name: Option<String>,
    /// New payment-routing key, if changing
    pub pix_key: Option<String>,
    /// New status, if changing
    pub status: Option<TeacherStatus>,
}

/// Applies the provided field changes to a live teacher and refreshes
/// `updated_at`.
pub async fn update_teacher(
    db: &DatabaseConnection,
    id: i64,
    changes: TeacherChanges,
) -> Result<teacher::Model> {
    let existing = get_teacher(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "teacher", id })?;

    let mut teacher: teacher::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation {
                field: "name",
                message: "This field may not be blank.".to_string(),
            });
        }
        teacher.name = Set(name);
    }
    if let Some(pix_key) = changes.pix_key {
        if pix_key.trim().is_empty() {
            return Err(Error::Validation {
                field: "pix_key",
                message: "This field may not be blank.".to_string(),
            });
        }
        teacher.pix_key = Set(pix_key);
    }
    if let Some(status) = changes.status {
        teacher.status = Set(status);
    }

    teacher.updated_at = Set(Utc::now());
    teacher.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Lesson, StudentsGroup, TeacherPayment};
    use crate::test_utils::{
        create_test_group, create_test_lesson, create_test_teacher, create_test_teacher_payment,
        setup_test_db,
    };
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_create_and_update_teacher() -> Result<()> {
        let db = setup_test_db().await?;

        let teacher = create_teacher(
            &db,
            "Maria Silva".to_string(),
            "maria@bank.example".to_string(),
            TeacherStatus::Active,
        )
        .await?;
        assert_eq!(teacher.status, TeacherStatus::Active);

        let updated = update_teacher(
            &db,
            teacher.id,
            TeacherChanges {
                status: Some(TeacherStatus::Former),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.status, TeacherStatus::Former);
        assert_eq!(updated.pix_key, "maria@bank.example");
        Ok(())
    }

    #[tokio::test]
    async fn test_teacher_name_tolerates_tombstones() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;

        lifecycle::soft_delete::<Teacher, _>(&db, teacher.id).await?;

        assert_eq!(teacher_name(&db, teacher.id).await?, "Maria Silva");
        assert_eq!(teacher_name(&db, 999).await?, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_hard_delete_cascades_to_dependents() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;
        let group = create_test_group(&db, teacher.id).await?;
        create_test_lesson(&db, group.id, teacher.id).await?;
        create_test_teacher_payment(&db, teacher.id).await?;

        assert!(lifecycle::hard_delete::<Teacher, _>(&db, teacher.id).await?);

        // Groups, lessons, and payments all go with the teacher row
        assert_eq!(StudentsGroup::find().count(&db).await?, 0);
        assert_eq!(Lesson::find().count(&db).await?, 0);
        assert_eq!(TeacherPayment::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_does_not_cascade() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;
        let group = create_test_group(&db, teacher.id).await?;

        lifecycle::soft_delete::<Teacher, _>(&db, teacher.id).await?;

        // The group row is untouched and still live
        let group = lifecycle::get_active::<StudentsGroup>(&db, group.id).await?;
        assert!(group.is_some());
        Ok(())
    }
}
