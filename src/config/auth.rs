//! Authentication settings loaded from the environment.

use crate::errors::{Error, Result};

/// JWT signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret; required, never defaulted.
    pub jwt_secret: String,
    /// Lifetime of access tokens, in minutes.
    pub access_token_minutes: i64,
    /// Lifetime of refresh tokens, in days.
    pub refresh_token_days: i64,
}

fn env_i64(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| Error::Config {
            message: format!("{name} must be an integer, got '{raw}'"),
        }),
        Err(_) => Ok(default),
    }
}

impl AuthConfig {
    /// Reads `JWT_SECRET` (required), `ACCESS_TOKEN_MINUTES` (default 60),
    /// and `REFRESH_TOKEN_DAYS` (default 7).
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| Error::Config {
            message: "JWT_SECRET must be set".to_string(),
        })?;

        Ok(Self {
            jwt_secret,
            access_token_minutes: env_i64("ACCESS_TOKEN_MINUTES", 60)?,
            refresh_token_days: env_i64("REFRESH_TOKEN_DAYS", 7)?,
        })
    }
}
