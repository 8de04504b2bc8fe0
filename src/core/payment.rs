//! School payment business logic.
//!
//! Payment values are stored as 2-decimal currency amounts; anything below
//! 0.01 is rejected, and 0.01 itself is the accepted minimum.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::entities::{Payment, PaymentMethod, payment};
use crate::errors::{Error, Result};

pub(crate) fn validate_value(value: Decimal) -> Result<()> {
    if value < Decimal::new(1, 2) {
        return Err(Error::InvalidAmount { amount: value });
    }
    Ok(())
}

/// Records a payment received by the school.
pub async fn create_payment(
    db: &DatabaseConnection,
    payment_method: PaymentMethod,
    value: Decimal,
    paid_at: DateTime<Utc>,
    description: Option<String>,
) -> Result<payment::Model> {
    validate_value(value)?;

    let now = Utc::now();
    let payment = payment::ActiveModel {
        payment_method: Set(payment_method),
        value: Set(value),
        paid_at: Set(paid_at),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = payment.insert(db).await?;
    info!(
        "Recorded payment {} of {} via {}",
        result.id,
        result.value,
        result.payment_method.display_name()
    );
    Ok(result)
}

/// Finds a live payment by id.
pub async fn get_payment(db: &DatabaseConnection, id: i64) -> Result<Option<payment::Model>> {
    lifecycle::get_active::<Payment>(db, id).await
}

/// Optional field updates for an existing payment.
#[derive(Debug, Default)]
pub struct PaymentChanges {
    /// New payment method, if changing
    pub payment_method: Option<PaymentMethod>,
    /// New amount, if changing
    pub value: Option<Decimal>,
    /// New completion timestamp, if changing
    pub paid_at: Option<DateTime<Utc>>,
    /// New description, if changing
    pub description: Option<String>,
}

/// Applies the provided field changes to a live payment and refreshes
/// `updated_at`.
pub async fn update_payment(
    db: &DatabaseConnection,
    id: i64,
    changes: PaymentChanges,
) -> Result<payment::Model> {
    let existing = get_payment(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "payment", id })?;

    let mut payment: payment::ActiveModel = existing.into();
    if let Some(payment_method) = changes.payment_method {
        payment.payment_method = Set(payment_method);
    }
    if let Some(value) = changes.value {
        validate_value(value)?;
        payment.value = Set(value);
    }
    if let Some(paid_at) = changes.paid_at {
        payment.paid_at = Set(paid_at);
    }
    if let Some(description) = changes.description {
        payment.description = Set(Some(description));
    }

    payment.updated_at = Set(Utc::now());
    payment.update(db).await.map_err(Into::into)
}
