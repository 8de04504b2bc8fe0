//! REST API surface.
//!
//! One module per resource, each exposing a `routes()` sub-router that is
//! registered explicitly in [`router`] at process start - the route table is
//! built once during initialization and read-only thereafter. Everything
//! under `/api` except the health probe and the token endpoints sits behind
//! the bearer middleware.

/// Token issuance/refresh and the bearer middleware
pub mod auth;
/// Enrollment contract endpoints
pub mod contracts;
/// Class group endpoints
pub mod groups;
/// Sales lead endpoints
pub mod leads;
/// Lesson endpoints
pub mod lessons;
/// Shared list-parameter handling (pagination, search, ordering)
pub mod params;
/// School payment endpoints
pub mod payments;
/// Product endpoints
pub mod products;
/// Student endpoints
pub mod students;
/// Teacher payment endpoints
pub mod teacher_payments;
/// Teacher endpoints
pub mod teachers;

use axum::http::Method;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::auth::AuthConfig;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// JWT settings used by the auth boundary
    pub auth: AuthConfig,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ncc-school",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all resources registered explicitly.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let protected = Router::new()
        .nest("/products", products::routes())
        .nest("/payments", payments::routes())
        .nest("/teacher-payments", teacher_payments::routes())
        .nest("/students", students::routes())
        .nest("/teachers", teachers::routes())
        .nest("/contracts", contracts::routes())
        .nest("/students-groups", groups::routes())
        .nest("/lessons", lessons::routes())
        .nest("/leads", leads::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/token", post(auth::obtain_token))
        .route("/api/auth/token/refresh", post(auth::refresh))
        .nest("/api", protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
