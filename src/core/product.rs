//! Product business logic - Handles course/service catalog operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{Product, product};
use crate::errors::{Error, Result};

/// Creates a new product after validating its name, price, and duration.
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
    price: Decimal,
    duration_months: i32,
    is_active: bool,
) -> Result<product::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "This field may not be blank.".to_string(),
        });
    }

    if price <= Decimal::ZERO {
        return Err(Error::Validation {
            field: "price",
            message: "Ensure this value is greater than 0.".to_string(),
        });
    }

    if duration_months < 1 {
        return Err(Error::Validation {
            field: "duration_months",
            message: "Ensure this value is greater than or equal to 1.".to_string(),
        });
    }

    let now = Utc::now();
    let product = product::ActiveModel {
        name: Set(name),
        description: Set(description),
        price: Set(price),
        duration_months: Set(duration_months),
        is_active: Set(is_active),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = product.insert(db).await?;
    info!("Created product '{}' (ID: {})", result.name, result.id);
    Ok(result)
}

/// Finds a live product by id.
pub async fn get_product(db: &DatabaseConnection, id: i64) -> Result<Option<product::Model>> {
    lifecycle::get_active::<Product>(db, id).await
}

/// Display name of a product for read projections, tolerating tombstones.
pub async fn product_name(db: &DatabaseConnection, id: i64) -> Result<String> {
    Ok(lifecycle::get_any::<Product>(db, id)
        .await?
        .map(|p| p.name)
        .unwrap_or_default())
}

/// Optional field updates for an existing product.
#[derive(Debug, Default)]
pub struct ProductChanges {
    /// New name, if changing
    pub name: Option<String>,
    /// New description, if changing
    pub description: Option<String>,
    /// New price, if changing
    pub price: Option<Decimal>,
    /// New duration in months, if changing
    pub duration_months: Option<i32>,
    /// New availability flag, if changing
    pub is_active: Option<bool>,
}

/// Applies the provided field changes to a live product and refreshes
/// `updated_at`. Fields left as `None` keep their current values.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i64,
    changes: ProductChanges,
) -> Result<product::Model> {
    let existing = get_product(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "product", id })?;

    let mut product: product::ActiveModel = existing.into();

    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation {
                field: "name",
                message: "This field may not be blank.".to_string(),
            });
        }
        product.name = Set(name);
    }
    if let Some(description) = changes.description {
        product.description = Set(Some(description));
    }
    if let Some(price) = changes.price {
        if price <= Decimal::ZERO {
            return Err(Error::Validation {
                field: "price",
                message: "Ensure this value is greater than 0.".to_string(),
            });
        }
        product.price = Set(price);
    }
    if let Some(duration_months) = changes.duration_months {
        if duration_months < 1 {
            return Err(Error::Validation {
                field: "duration_months",
                message: "Ensure this value is greater than or equal to 1.".to_string(),
            });
        }
        product.duration_months = Set(duration_months);
    }
    if let Some(is_active) = changes.is_active {
        product.is_active = Set(is_active);
    }

    product.updated_at = Set(Utc::now());
    product.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        // Blank name
        let result = create_product(
            &db,
            "   ".to_string(),
            None,
            Decimal::new(29999, 2),
            6,
            true,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        // Non-positive price
        let result =
            create_product(&db, "Python Course".to_string(), None, Decimal::ZERO, 6, true).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "price", .. }
        ));

        // Zero duration
        let result = create_product(
            &db,
            "Python Course".to_string(),
            None,
            Decimal::new(29999, 2),
            0,
            true,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "duration_months",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_product() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(
            &db,
            "Python Course".to_string(),
            Some("Learn Python programming".to_string()),
            Decimal::new(29999, 2),
            6,
            true,
        )
        .await?;

        assert_eq!(product.name, "Python Course");
        assert_eq!(product.price, Decimal::new(29999, 2));
        assert_eq!(product.duration_months, 6);
        assert!(product.is_active);

        let fetched = get_product(&db, product.id).await?.unwrap();
        assert_eq!(fetched, product);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_partial_changes() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_product(
            &db,
            "Python Course".to_string(),
            None,
            Decimal::new(29999, 2),
            6,
            true,
        )
        .await?;

        let updated = update_product(
            &db,
            product.id,
            ProductChanges {
                name: Some("Advanced Python Course".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.name, "Advanced Python Course");
        // Untouched fields keep their values
        assert_eq!(updated.price, product.price);
        assert_eq!(updated.duration_months, product.duration_months);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_product(&db, 999, ProductChanges::default()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }
}
