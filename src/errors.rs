//! Unified error type for the whole crate.
//!
//! Core operations return these variants directly; the API layer relies on the
//! [`IntoResponse`] impl at the bottom to translate each variant into the HTTP
//! status and JSON body the clients expect.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

/// Crate-wide error enum.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing, empty, or out of range.
    #[error("validation failed on `{field}`: {message}")]
    Validation {
        /// Name of the offending field, as it appears on the wire.
        field: &'static str,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A monetary amount below the accepted minimum (or non-positive).
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// Lookup by path id found no live record.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. "student".
        entity: &'static str,
        /// The id that failed to resolve.
        id: i64,
    },

    /// A foreign key supplied in a request body does not resolve to a live record.
    #[error("invalid reference in `{field}`: no live record with id {id}")]
    InvalidReference {
        /// Name of the referencing field, as it appears on the wire.
        field: &'static str,
        /// The id that failed to resolve.
        id: i64,
    },

    /// The (student, product) pair already has a contract, deleted or not.
    #[error("a contract for student {student_id} and product {product_id} already exists")]
    DuplicateContract {
        /// Student side of the offending pair.
        student_id: i64,
        /// Product side of the offending pair.
        product_id: i64,
    },

    /// Login payload was missing the username or the password.
    #[error("Username and password are required")]
    MissingCredentials,

    /// Uniform rejection for unknown user, wrong password, or inactive user.
    #[error("Invalid credentials or user not active")]
    InvalidCredentials,

    /// Bearer check failed on a protected route.
    #[error("{message}")]
    Unauthorized {
        /// Reason shown to the caller.
        message: String,
    },

    /// Configuration error during startup.
    #[error("Configuration error: {message}")]
    Config {
        /// What was missing or malformed.
        message: String,
    },

    /// Database error bubbled up from SeaORM.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JWT encoding failure (decoding failures surface as `Unauthorized`).
    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failure.
    #[error("Password hashing error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Error::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "errors": { (*field): [message] } }),
            ),
            Error::InvalidAmount { amount } => (
                StatusCode::BAD_REQUEST,
                json!({ "errors": { "value": [format!("Ensure this value is greater than or equal to 0.01 (got {amount}).")] } }),
            ),
            Error::InvalidReference { field, id } => (
                StatusCode::BAD_REQUEST,
                json!({ "errors": { (*field): [format!("Invalid pk \"{id}\" - object does not exist.")] } }),
            ),
            Error::DuplicateContract { .. } => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, json!({ "detail": "Not found." })),
            Error::MissingCredentials => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, json!({ "error": self.to_string() }))
            }
            Error::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, json!({ "detail": message }))
            }
            Error::Database(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error." }),
                )
            }
            Error::Jwt(_) | Error::Bcrypt(_) | Error::Io(_) | Error::Config { .. } => {
                tracing::error!("internal error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error." }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
