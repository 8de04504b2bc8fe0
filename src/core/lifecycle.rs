//! Timestamp and soft-delete lifecycle shared by every entity.
//!
//! Records are never physically removed by the normal delete path; instead
//! `deleted_at` is stamped and all default reads filter the tombstoned rows
//! out. The capability is expressed as a small trait each entity opts into by
//! naming its lifecycle columns, with free functions generic over the trait -
//! no base-struct inheritance, and the repository layer works for any entity.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Select, Value,
};

use crate::entities::{
    contract, lead, lesson, payment, product, student, students_group, teacher, teacher_payment,
    user,
};
use crate::errors::Result;

/// Capability set for entities carrying the shared lifecycle columns.
pub trait LifecycleEntity: EntityTrait {
    /// The integer primary-key column.
    fn id_column() -> Self::Column;
    /// The column refreshed on every mutation.
    fn updated_at_column() -> Self::Column;
    /// The tombstone column; null while the record is live.
    fn deleted_at_column() -> Self::Column;
}

/// Pure deletion predicate over a loaded model.
pub trait Tombstoned {
    /// The tombstone timestamp, if the record was soft-deleted.
    fn deleted_at(&self) -> Option<chrono::DateTime<Utc>>;

    /// Whether the record is soft-deleted.
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

macro_rules! lifecycle_entity {
    ($module:ident) => {
        impl LifecycleEntity for $module::Entity {
            fn id_column() -> Self::Column {
                $module::Column::Id
            }

            fn updated_at_column() -> Self::Column {
                $module::Column::UpdatedAt
            }

            fn deleted_at_column() -> Self::Column {
                $module::Column::DeletedAt
            }
        }

        impl Tombstoned for $module::Model {
            fn deleted_at(&self) -> Option<chrono::DateTime<Utc>> {
                self.deleted_at
            }
        }
    };
}

lifecycle_entity!(contract);
lifecycle_entity!(lead);
lifecycle_entity!(lesson);
lifecycle_entity!(payment);
lifecycle_entity!(product);
lifecycle_entity!(student);
lifecycle_entity!(students_group);
lifecycle_entity!(teacher);
lifecycle_entity!(teacher_payment);
lifecycle_entity!(user);

/// Base query for the default read path: live records only.
///
/// List handlers build on this to add their filters, search, and ordering,
/// so tombstoned rows can never leak into a collection response.
pub fn select_active<E: LifecycleEntity>() -> Select<E> {
    E::find().filter(E::deleted_at_column().is_null())
}

/// Retrieves all live records of an entity.
pub async fn list_active<E: LifecycleEntity>(db: &DatabaseConnection) -> Result<Vec<E::Model>> {
    select_active::<E>().all(db).await.map_err(Into::into)
}

/// Retrieves every record regardless of deletion state.
pub async fn list_all<E: LifecycleEntity>(db: &DatabaseConnection) -> Result<Vec<E::Model>> {
    E::find().all(db).await.map_err(Into::into)
}

/// Retrieves only the soft-deleted records.
pub async fn list_deleted<E: LifecycleEntity>(db: &DatabaseConnection) -> Result<Vec<E::Model>> {
    E::find()
        .filter(E::deleted_at_column().is_not_null())
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a live record by id, returning None for missing or tombstoned rows.
pub async fn get_active<E: LifecycleEntity>(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<E::Model>> {
    select_active::<E>()
        .filter(E::id_column().eq(id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a record by id regardless of deletion state.
///
/// Used by read projections that resolve display names of related records,
/// which must not explode when the related record was tombstoned.
pub async fn get_any<E: LifecycleEntity>(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<E::Model>> {
    E::find()
        .filter(E::id_column().eq(id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Soft-deletes a record: stamps `deleted_at` (and `updated_at`) with now.
///
/// Idempotent - a second call only moves the tombstone timestamp. The write
/// is a single-row UPDATE, so a storage failure fails the whole operation
/// with no partial state. Returns whether a row was matched.
pub async fn soft_delete<E, C>(db: &C, id: i64) -> Result<bool>
where
    E: LifecycleEntity,
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Value::from(now)))
        .col_expr(E::updated_at_column(), Expr::value(Value::from(now)))
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Physically removes a record, bypassing the tombstone bookkeeping.
///
/// Irreversible. The database applies the declared FK cascades as part of
/// the same statement, so a teacher's dependent rows go with it atomically.
pub async fn hard_delete<E, C>(db: &C, id: i64) -> Result<bool>
where
    E: LifecycleEntity,
    C: ConnectionTrait,
{
    let result = E::delete_many()
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
