//! User entity - The authentication principal for the API.
//!
//! Users are not exposed as a CRUD resource; they exist to gate access and are
//! seeded at startup from the environment. Only the bcrypt hash of the
//! password is ever stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// API user database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across all rows
    #[sea_orm(unique)]
    pub username: String,
    /// Email address of the user
    pub email: String,
    /// First name of the user
    pub first_name: String,
    /// Last name of the user
    pub last_name: String,
    /// Bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Inactive users are rejected at login with the same error as bad credentials
    pub is_active: bool,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
    /// Tombstone timestamp - set when the record is soft deleted
    pub deleted_at: Option<DateTimeUtc>,
}

/// Users reference no other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
