//! Teacher compensation business logic.
//!
//! Shares the value rules of school payments and additionally ties each row
//! to a live teacher.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::info;

use crate::core::lifecycle;
use crate::core::payment::validate_value;
use crate::entities::{PaymentMethod, Teacher, TeacherPayment, teacher_payment};
use crate::errors::{Error, Result};

/// Records a payment made to a teacher.
pub async fn create_teacher_payment(
    db: &DatabaseConnection,
    teacher_id: i64,
    value: Decimal,
    paid_at: DateTime<Utc>,
    payment_method: PaymentMethod,
    description: Option<String>,
) -> Result<teacher_payment::Model> {
    validate_value(value)?;
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
    let payment = teacher_payment::ActiveModel {
        teacher_id: Set(teacher_id),
        value: Set(value),
        paid_at: Set(paid_at),
        payment_method: Set(payment_method),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = payment.insert(db).await?;
    info!(
        "Recorded teacher payment {} of {} to teacher {}",
        result.id, result.value, teacher_id
    );
    Ok(result)
}

/// Finds a live teacher payment by id.
pub async fn get_teacher_payment(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<teacher_payment::Model>> {
    lifecycle::get_active::<TeacherPayment>(db, id).await
}

/// Optional field updates for an existing teacher payment.
#[derive(Debug, Default)]
pub struct TeacherPaymentChanges {
    /// New receiving teacher, if changing
    pub teacher_id: Option<i64>,
    /// New amount, if changing
    pub value: Option<Decimal>,
    /// New completion timestamp, if changing
    pub paid_at: Option<DateTime<Utc>>,
    /// New payment method, if changing
    pub payment_method: Option<PaymentMethod>,
    /// New description, if changing
    pub description: Option<String>,
}

/// Applies the provided field changes to a live teacher payment and
/// refreshes `updated_at`.
pub async fn update_teacher_payment(
    db: &DatabaseConnection,
    id: i64,
    changes: TeacherPaymentChanges,
) -> Result<teacher_payment::Model> {
    let existing = get_teacher_payment(db, id)
        .await?
        .ok_or(Error::NotFound { entity: "teacher_payment", id })?;

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

    let mut payment: teacher_payment::ActiveModel = existing.into();
    if let Some(teacher_id) = changes.teacher_id {
        payment.teacher_id = Set(teacher_id);
    }
    if let Some(value) = changes.value {
        validate_value(value)?;
        payment.value = Set(value);
    }
    if let Some(paid_at) = changes.paid_at {
        payment.paid_at = Set(paid_at);
    }
    if let Some(payment_method) = changes.payment_method {
        payment.payment_method = Set(payment_method);
    }
    if let Some(description) = changes.description {
        payment.description = Set(Some(description));
    }

    payment.updated_at = Set(Utc::now());
    payment.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_teacher, setup_test_db};

    #[tokio::test]
    async fn test_create_teacher_payment() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;

        let payment = create_teacher_payment(
            &db,
            teacher.id,
            Decimal::new(250000, 2),
            Utc::now(),
            PaymentMethod::Pix,
            Some("March salary".to_string()),
        )
        .await?;
        assert_eq!(payment.teacher_id, teacher.id);
        assert_eq!(payment.value, Decimal::new(250000, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_value_boundary_applies() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;

        let result = create_teacher_payment(
            &db,
            teacher.id,
            Decimal::ZERO,
            Utc::now(),
            PaymentMethod::Pix,
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        let minimum = create_teacher_payment(
            &db,
            teacher.id,
            Decimal::new(1, 2),
            Utc::now(),
            PaymentMethod::Pix,
            None,
        )
        .await?;
        assert_eq!(minimum.value, Decimal::new(1, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_teacher_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_teacher_payment(
            &db,
            999,
            Decimal::new(1000, 2),
            Utc::now(),
            PaymentMethod::Boleto,
            None,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidReference { field: "teacher", .. }
        ));
        Ok(())
    }
}
