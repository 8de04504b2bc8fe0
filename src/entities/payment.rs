//! Payment entity - Represents payments received by the school.
//!
//! The `PaymentMethod` enum defined here is shared with teacher payments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit card
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    /// PIX instant transfer
    #[sea_orm(string_value = "pix")]
    Pix,
    /// Boleto bank slip
    #[sea_orm(string_value = "boleto")]
    Boleto,
}

impl PaymentMethod {
    /// Human-readable label for the payment-method code.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::Pix => "PIX",
            Self::Boleto => "Boleto",
        }
    }
}

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Method used for the payment
    pub payment_method: PaymentMethod,
    /// Amount paid in local currency (minimum 0.01)
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub value: Decimal,
    /// Timestamp when the payment was completed
    pub paid_at: DateTimeUtc,
    /// Description or reference for the payment
    pub description: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Payments reference no other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
