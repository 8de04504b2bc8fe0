//! Lesson business logic.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{Lesson, StudentsGroup, Teacher, lesson};
use crate::errors::{Error, Result};

/// Creates a lesson conducted by a teacher for a group.
pub async fn create_lesson(
    db: &DatabaseConnection,
    students_group_id: i64,
    teacher_id: i64,
    occurred_at: DateTime<Utc>,
    notes: Option<String>,
) -> Result<lesson::Model> {
    if lifecycle::get_active::<StudentsGroup>(db, students_group_id)
        .await?
        .is_none()
    {
        return Err(Error::InvalidReference {
            field: "students_group",
            id: students_group_id,
        });
    }
    if lifecycle::get_active::<Teacher>(db, teacher_id)
        .await?
        .is_none()
    {
        return Err(Error::InvalidReference {
            field: "teacher",
            id: teacher_id,
        });
    }

    let now = Utc::now();
    let lesson = lesson::ActiveModel {
        students_group_id: Set(students_group_id),
        teacher_id: Set(teacher_id),
        occurred_at: Set(occurred_at),
        notes: Set(notes),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = lesson.insert(db).await?;
    info!(
        "Created lesson {} (group {}, teacher {})",
        result.id, students_group_id, teacher_id
    );
    Ok(result)
}

/// Finds a live lesson by id.
pub async fn get_lesson(db: &DatabaseConnection, id: i64) -> Result<Option<lesson::Model>> {
    lifecycle::get_active::<Lesson>(db, id).await
}

/// Optional field updates for an existing lesson.
#[derive(Debug, Default)]
pub struct LessonChanges {
    /// New owning group, if changing
    pub students_group_id: Option<i64>,
    /// New conducting teacher, if changing
    pub teacher_id: Option<i64>,
    /// New session timestamp, if changing
    pub occurred_at: Option<DateTime<Utc>>,
    /// New notes, if changing
    pub notes: Option<String>,
}

/// Applies the provided field changes to a live lesson and refreshes
/// `updated_at`.
pub async fn update_lesson(
    db: &DatabaseConnection,
    id: i64,
    changes: LessonChanges,
) -> Result<lesson::Model> {
    let existing = get_lesson(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "lesson", id })?;

    if let Some(students_group_id) = changes.students_group_id {
        if lifecycle::get_active::<StudentsGroup>(db, students_group_id)
            .await?
            .is_none()
        {
            return Err(Error::InvalidReference {
                field: "students_group",
                id: students_group_id,
            });
        }
    }
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

    let mut lesson: lesson::ActiveModel = existing.into();
    if let Some(students_group_id) = changes.students_group_id {
        lesson.students_group_id = Set(students_group_id);
    }
    if let Some(teacher_id) = changes.teacher_id {
        lesson.teacher_id = Set(teacher_id);
    }
    if let Some(occurred_at) = changes.occurred_at {
        lesson.occurred_at = Set(occurred_at);
    }
    if let Some(notes) = changes.notes {
        lesson.notes = Set(Some(notes));
    }

    lesson.updated_at = Set(Utc::now());
    lesson.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_group, create_test_teacher, setup_test_db};

    #[tokio::test]
    async fn test_create_lesson_and_update_notes() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;
        let group = create_test_group(&db, teacher.id).await?;

        let lesson = create_lesson(
            &db,
            group.id,
            teacher.id,
            Utc::now(),
            Some("Introductions".to_string()),
        )
        .await?;
        assert_eq!(lesson.notes.as_deref(), Some("Introductions"));

        let updated = update_lesson(
            &db,
            lesson.id,
            LessonChanges {
                notes: Some("Chapter 1".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.notes.as_deref(), Some("Chapter 1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_lesson_requires_live_group_and_teacher() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;
        let group = create_test_group(&db, teacher.id).await?;

        let result = create_lesson(&db, 999, teacher.id, Utc::now(), None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidReference {
                field: "students_group",
                ..
            }
        ));

        lifecycle::soft_delete::<Teacher, _>(&db, teacher.id).await?;
        let result = create_lesson(&db, group.id, teacher.id, Utc::now(), None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidReference { field: "teacher", .. }
        ));
        Ok(())
    }
}
