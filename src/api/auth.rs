//! Authentication boundary: token issuance, renewal, and the bearer gate.
//!
//! Stateless JWT scheme with two token types. Issuance verifies the
//! username/password pair and returns a short-lived access token, a
//! longer-lived refresh token, and the access expiry; renewal exchanges a
//! valid refresh token for a fresh access token without touching storage.
//! Failure payloads never distinguish unknown users from wrong passwords.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::AppState;
use crate::config::auth::AuthConfig;
use crate::core::user;
use crate::errors::{Error, Result};

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Claims carried by both token types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the authenticated user.
    pub sub: i64,
    /// Expiry as a unix timestamp.
    pub exp: usize,
    /// Either "access" or "refresh"; each is rejected where the other is
    /// expected.
    pub token_type: String,
}

/// Signs a token of the given type and returns it with its expiry.
pub(crate) fn encode_token(
    user_id: i64,
    token_type: &str,
    lifetime: Duration,
    config: &AuthConfig,
) -> Result<(String, DateTime<Utc>)> {
    let expires_at = Utc::now() + lifetime;
    let claims = Claims {
        sub: user_id,
        exp: usize::try_from(expires_at.timestamp()).unwrap_or(usize::MAX),
        token_type: token_type.to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok((token, expires_at))
}

/// Decodes a token and checks it carries the expected type.
fn decode_token(token: &str, expected_type: &str, config: &AuthConfig) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        debug!("token rejected: {err}");
        Error::Unauthorized {
            message: "Given token not valid for any token type".to_string(),
        }
    })?;

    if data.claims.token_type != expected_type {
        return Err(Error::Unauthorized {
            message: "Given token not valid for any token type".to_string(),
        });
    }
    Ok(data.claims)
}

/// Login payload; both fields are checked before touching storage.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Login name
    pub username: Option<String>,
    /// Clear-text password, verified against the stored hash
    pub password: Option<String>,
}

/// Public view of the authenticated user returned at issuance.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User id
    pub id: i64,
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
}

/// Successful issuance payload.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Short-lived bearer credential
    pub access_token: String,
    /// Longer-lived renewal credential
    pub refresh_token: String,
    /// Expiry of the access token
    pub expires_at: DateTime<Utc>,
    /// The authenticated user
    pub user: UserInfo,
}

/// `POST /api/auth/token` - verifies credentials and mints both tokens.
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(Error::MissingCredentials);
    };

    let user = user::authenticate(&state.db, &username, &password).await?;

    let (access_token, expires_at) = encode_token(
        user.id,
        TOKEN_TYPE_ACCESS,
        Duration::minutes(state.auth.access_token_minutes),
        &state.auth,
    )?;
    let (refresh_token, _) = encode_token(
        user.id,
        TOKEN_TYPE_REFRESH,
        Duration::days(state.auth.refresh_token_days),
        &state.auth,
    )?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        expires_at,
        user: UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        },
    }))
}

/// Renewal payload.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// A refresh-typed token from a prior issuance
    pub refresh: Option<String>,
}

/// Successful renewal payload.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Fresh access token
    pub access_token: String,
    /// Expiry of the new access token
    pub expires_at: DateTime<Utc>,
}

/// `POST /api/auth/token/refresh` - exchanges a refresh token for a fresh
/// access token. Stateless: the refresh token itself is the proof.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let refresh = payload.refresh.ok_or(Error::Validation {
        field: "refresh",
        message: "This field is required.".to_string(),
    })?;

    let claims = decode_token(&refresh, TOKEN_TYPE_REFRESH, &state.auth)?;

    let (access_token, expires_at) = encode_token(
        claims.sub,
        TOKEN_TYPE_ACCESS,
        Duration::minutes(state.auth.access_token_minutes),
        &state.auth,
    )?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_at,
    }))
}

/// Bearer middleware guarding every resource route.
///
/// Validates `Authorization: Bearer <access token>` and stores the claims in
/// the request extensions; anything else is rejected with 401 before the
/// handler runs.
pub async fn require_bearer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(token) = header.and_then(|value| value.strip_prefix("Bearer ")) else {
        return Error::Unauthorized {
            message: "Authentication credentials were not provided.".to_string(),
        }
        .into_response();
    };

    match decode_token(token, TOKEN_TYPE_ACCESS, &state.auth) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
