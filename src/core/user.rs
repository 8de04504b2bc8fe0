//! API user management and credential verification.
//!
//! Only the bcrypt hash of a password is stored. Authentication failures are
//! deliberately uniform: unknown username, wrong password, and inactive user
//! all produce the same error so callers cannot enumerate accounts.

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::{info, warn};

use crate::entities::{User, user};
use crate::errors::{Error, Result};

/// Creates an API user with a freshly hashed password.
pub async fn create_user(
    db: &DatabaseConnection,
    username: String,
    password: String,
    email: String,
    first_name: String,
    last_name: String,
) -> Result<user::Model> {
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(Error::Validation {
            field: "username",
            message: "This field may not be blank.".to_string(),
        });
    }
    if password.is_empty() {
        return Err(Error::Validation {
            field: "password",
            message: "This field may not be blank.".to_string(),
        });
    }

    let password_hash = hash(&password, DEFAULT_COST)?;

    let now = Utc::now();
    let user = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        first_name: Set(first_name),
        last_name: Set(last_name),
        password_hash: Set(password_hash),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let result = user.insert(db).await?;
    info!("Created user '{}' (ID: {})", result.username, result.id);
    Ok(result)
}

/// Finds a live user by username.
pub async fn get_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a live user by id; used when minting tokens for a known subject.
pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<user::Model>> {
    crate::core::lifecycle::get_active::<User>(db, id).await
}

/// Verifies a username/password pair against the stored credentials.
///
/// Every failure path returns [`Error::InvalidCredentials`]; nothing in the
/// response distinguishes "no such user" from "wrong password" or
/// "deactivated account".
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(user) = get_by_username(db, username).await? else {
        return Err(Error::InvalidCredentials);
    };

    if !verify(password, &user.password_hash)? {
        return Err(Error::InvalidCredentials);
    }

    if !user.is_active {
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

/// Seeds the initial API user from `ADMIN_USERNAME`/`ADMIN_PASSWORD`
/// (optionally `ADMIN_EMAIL`) at startup. Idempotent: an existing user with
/// that username is left untouched.
pub async fn seed_admin_from_env(db: &DatabaseConnection) -> Result<()> {
    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set; skipping admin seeding");
        return Ok(());
    };

    if get_by_username(db, &username).await?.is_some() {
        return Ok(());
    }

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_default();
    create_user(db, username, password, email, String::new(), String::new()).await?;
    Ok(())
}
