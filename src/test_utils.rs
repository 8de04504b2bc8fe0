//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::core::{group, lesson, product, student, teacher, teacher_payment, user};
use crate::entities::{self, PaymentMethod, StudentStatus, TeacherStatus};
use crate::errors::Result;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `description`: None
/// * `price`: 299.99
/// * `duration_months`: 6
/// * `is_active`: true
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        name.to_string(),
        None,
        Decimal::new(29999, 2),
        6,
        true,
    )
    .await
}

/// Creates a test student with sensible defaults (born 2000-01-01, active).
pub async fn create_test_student(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::student::Model> {
    student::create_student(
        db,
        name.to_string(),
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        None,
        StudentStatus::Active,
    )
    .await
}

/// Creates a test teacher with sensible defaults (active, pix key derived
/// from the name).
pub async fn create_test_teacher(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::teacher::Model> {
    teacher::create_teacher(
        db,
        name.to_string(),
        format!("{}@pix.example", name.to_lowercase().replace(' ', ".")),
        TeacherStatus::Active,
    )
    .await
}

/// Creates an empty test group owned by the given teacher (capacity 10,
/// scheduled now).
pub async fn create_test_group(
    db: &DatabaseConnection,
    teacher_id: i64,
) -> Result<entities::students_group::Model> {
    group::create_group(db, Utc::now(), teacher_id, 10, vec![]).await
}

/// Creates a test lesson for the given group and teacher.
pub async fn create_test_lesson(
    db: &DatabaseConnection,
    group_id: i64,
    teacher_id: i64,
) -> Result<entities::lesson::Model> {
    lesson::create_lesson(db, group_id, teacher_id, Utc::now(), None).await
}

/// Creates a test teacher payment of 2500.00 via PIX.
pub async fn create_test_teacher_payment(
    db: &DatabaseConnection,
    teacher_id: i64,
) -> Result<entities::teacher_payment::Model> {
    teacher_payment::create_teacher_payment(
        db,
        teacher_id,
        Decimal::new(250000, 2),
        Utc::now(),
        PaymentMethod::Pix,
        None,
    )
    .await
}

/// Builds a router over a fresh in-memory database, with one seeded API
/// user (`testuser` / `testpass123`) and a fixed test JWT secret.
pub async fn setup_test_app() -> Result<(axum::Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    create_test_user(&db, "testuser", "testpass123").await?;
    let state = crate::api::AppState {
        db: db.clone(),
        auth: crate::config::auth::AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_minutes: 60,
            refresh_token_days: 7,
        },
    };
    Ok((crate::api::router(state), db))
}

/// Builds a JSON request for handler tests.
pub fn json_request(
    method: axum::http::Method,
    uri: &str,
    body: serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .expect("valid test request")
}

/// Builds a bodyless request carrying a bearer token.
pub fn authed_request(
    method: axum::http::Method,
    uri: &str,
    token: &str,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .expect("valid test request")
}

/// Builds a JSON request carrying a bearer token.
pub fn authed_json_request(
    method: axum::http::Method,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {token}"))
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .expect("valid test request")
}

/// Collects a response body into JSON (null for empty bodies).
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    }
}

/// Logs in as the seeded test user and returns a bearer access token.
pub async fn obtain_test_token(app: &axum::Router) -> String {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(json_request(
            axum::http::Method::POST,
            "/api/auth/token",
            serde_json::json!({"username": "testuser", "password": "testpass123"}),
        ))
        .await
        .expect("token response");
    let body = body_json(response).await;
    body["access_token"]
        .as_str()
        .expect("access token in response")
        .to_string()
}

/// Creates a test API user with the given credentials.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        username.to_string(),
        password.to_string(),
        format!("{username}@example.com"),
        "Test".to_string(),
        "User".to_string(),
    )
    .await
}
