//! Contract business logic - enrollment of a student in a product.
//!
//! The one real invariant lives here: a student may hold at most one contract
//! per product. The uniqueness is declared over physical rows, so a
//! soft-deleted contract still blocks re-contracting the same pair. The
//! application-level pre-check below produces the structured error; the
//! composite unique index (see `config::database`) backstops it at the
//! storage level.

use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{Contract, Product, Student, contract};
use crate::errors::{Error, Result};

/// Finds the contract row for a (student, product) pair regardless of
/// deletion state.
pub async fn find_pair_any(
    db: &DatabaseConnection,
    student_id: i64,
    product_id: i64,
) -> Result<Option<contract::Model>> {
    Contract::find()
        .filter(contract::Column::StudentId.eq(student_id))
        .filter(contract::Column::ProductId.eq(product_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a contract enrolling a student in a product.
///
/// Both references must resolve to live records, and the (student, product)
/// pair must not already have a contract - live or tombstoned.
pub async fn create_contract(
    db: &DatabaseConnection,
    student_id: i64,
    product_id: i64,
) -> Result<contract::Model> {
    if lifecycle::get_active::<Student>(db, student_id)
        .await?
        .is_none()
    {
        return Err(Error::InvalidReference {
            field: "student",
            id: student_id,
        });
    }
    if lifecycle::get_active::<Product>(db, product_id)
        .await?
        .is_none()
    {
        return Err(Error::InvalidReference {
            field: "product",
            id: product_id,
        });
    }

    if find_pair_any(db, student_id, product_id).await?.is_some() {
        return Err(Error::DuplicateContract {
            student_id,
            product_id,
        });
    }

    let now = Utc::now();
    let contract = contract::ActiveModel {
        student_id: Set(student_id),
        product_id: Set(product_id),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = contract.insert(db).await?;
    info!(
        "Created contract {} (student {}, product {})",
        result.id, student_id, product_id
    );
    Ok(result)
}

/// Finds a live contract by id.
pub async fn get_contract(db: &DatabaseConnection, id: i64) -> Result<Option<contract::Model>> {
    lifecycle::get_active::<Contract>(db, id).await
}

/// Optional field updates for an existing contract.
#[derive(Debug, Default)]
pub struct ContractChanges {
    /// New student reference, if changing
    pub student_id: Option<i64>,
    /// New product reference, if changing
    pub product_id: Option<i64>,
}

/// Re-points a live contract at a different student and/or product,
/// re-checking the pair uniqueness against every other physical row.
pub async fn update_contract(
    db: &DatabaseConnection,
    id: i64,
    changes: ContractChanges,
) -> Result<contract::Model> {
    let existing = get_contract(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "contract", id })?;

    let student_id = changes.student_id.unwrap_or(existing.student_id);
    let product_id = changes.product_id.unwrap_or(existing.product_id);

    if changes.student_id.is_some()
        && lifecycle::get_active::<Student>(db, student_id)
            .await?
            .is_none()
    {
        return Err(Error::InvalidReference {
            field: "student",
            id: student_id,
        });
    }
    if changes.product_id.is_some()
        && lifecycle::get_active::<Product>(db, product_id)
            .await?
            .is_none()
    {
        return Err(Error::InvalidReference {
            field: "product",
            id: product_id,
        });
    }

    if let Some(other) = find_pair_any(db, student_id, product_id).await? {
        if other.id != id {
            return Err(Error::DuplicateContract {
                student_id,
                product_id,
            });
        }
    }

    let mut contract: contract::ActiveModel = existing.into();
    contract.student_id = Set(student_id);
    contract.product_id = Set(product_id);
    contract.updated_at = Set(Utc::now());
    contract.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_product, create_test_student, setup_test_db};

    #[tokio::test]
    async fn test_create_contract_happy_path() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "John Doe").await?;
        let product = create_test_product(&db, "Python Course").await?;

        let contract = create_contract(&db, student.id, product.id).await?;
        assert_eq!(contract.student_id, student.id);
        assert_eq!(contract.product_id, product.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "John Doe").await?;
        let product = create_test_product(&db, "Python Course").await?;

        create_contract(&db, student.id, product.id).await?;
        let result = create_contract(&db, student.id, product.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateContract { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_same_student_different_products_allowed() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "John Doe").await?;
        let python = create_test_product(&db, "Python Course").await?;
        let rust = create_test_product(&db, "Rust Course").await?;

        create_contract(&db, student.id, python.id).await?;
        let second = create_contract(&db, student.id, rust.id).await?;
        assert_eq!(second.product_id, rust.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_deleted_contract_still_blocks_pair() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "John Doe").await?;
        let product = create_test_product(&db, "Python Course").await?;

        let contract = create_contract(&db, student.id, product.id).await?;
        lifecycle::soft_delete::<Contract, _>(&db, contract.id).await?;

        // Uniqueness operates on physical rows, not the filtered view
        let result = create_contract(&db, student.id, product.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateContract { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_references_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "John Doe").await?;

        let result = create_contract(&db, student.id, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidReference { field: "product", .. }
        ));

        let result = create_contract(&db, 999, 1).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidReference { field: "student", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_contract_pair_check_excludes_self() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "John Doe").await?;
        let python = create_test_product(&db, "Python Course").await?;
        let rust = create_test_product(&db, "Rust Course").await?;

        let contract = create_contract(&db, student.id, python.id).await?;
        create_contract(&db, student.id, rust.id).await?;

        // No-op update against its own pair is fine
        let unchanged = update_contract(&db, contract.id, ContractChanges::default()).await?;
        assert_eq!(unchanged.product_id, python.id);

        // Re-pointing onto an occupied pair is not
        let result = update_contract(
            &db,
            contract.id,
            ContractChanges {
                product_id: Some(rust.id),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateContract { .. }
        ));
        Ok(())
    }
}
