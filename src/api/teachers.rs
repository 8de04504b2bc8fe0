//! Teacher endpoints.
//!
//! Filters: `status`. Search: name. Ordering: name (default), created_at.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter, QueryOrder, Select};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::lifecycle;
use crate::core::teacher::{self, TeacherChanges};
use crate::entities::{Teacher, TeacherColumn, TeacherModel, TeacherStatus};
use crate::errors::{Error, Result};

/// Teacher wire representation: all fields plus the status label.
#[derive(Debug, Serialize)]
pub struct TeacherResponse {
    #[serde(flatten)]
    teacher: TeacherModel,
    status_display: &'static str,
}

fn to_response(teacher: TeacherModel) -> TeacherResponse {
    let status_display = teacher.status.display_name();
    TeacherResponse {
        teacher,
        status_display,
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    status: Option<TeacherStatus>,
}

fn apply_ordering(query: Select<Teacher>, ordering: Option<&str>) -> Select<Teacher> {
    match params::parse_ordering(ordering) {
        Some(("name", order)) => query.order_by(TeacherColumn::Name, order),
        Some(("created_at", order)) => query.order_by(TeacherColumn::CreatedAt, order),
        _ => query.order_by_asc(TeacherColumn::Name),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<TeacherResponse>>> {
    let mut query = lifecycle::select_active::<Teacher>();
    if let Some(status) = list_params.status {
        query = query.filter(TeacherColumn::Status.eq(status));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query.filter(TeacherColumn::Name.contains(term));
    }
    let query = apply_ordering(query, list_params.ordering.as_deref());

    let pager = Pager::from_params(list_params.page, list_params.page_size);
    let paginator = query.paginate(&state.db, pager.page_size);
    let count = paginator.num_items().await?;
    let results = paginator
        .fetch_page(pager.index())
        .await?
        .into_iter()
        .map(to_response)
        .collect();
    Ok(Json(ListEnvelope { count, results }))
}

#[derive(Debug, Deserialize)]
struct TeacherPayload {
    name: Option<String>,
    pix_key: Option<String>,
    status: Option<TeacherStatus>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TeacherPayload>,
) -> Result<(StatusCode, Json<TeacherResponse>)> {
    let name = params::required(payload.name, "name")?;
    let pix_key = params::required(payload.pix_key, "pix_key")?;

    let created = teacher::create_teacher(
        &state.db,
        name,
        pix_key,
        payload.status.unwrap_or(TeacherStatus::Active),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(to_response(created))))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeacherResponse>> {
    teacher::get_teacher(&state.db, id)
        .await?
        .map(|model| Json(to_response(model)))
        .ok_or(Error::NotFound { entity: "teacher", id })
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TeacherPayload>,
) -> Result<Json<TeacherResponse>> {
    let changes = TeacherChanges {
        name: payload.name,
        pix_key: payload.pix_key,
        status: payload.status,
    };
    let updated = teacher::update_teacher(&state.db, id, changes).await?;
    Ok(Json(to_response(updated)))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if teacher::get_teacher(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "teacher", id });
    }
    lifecycle::soft_delete::<Teacher, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for teachers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        authed_json_request, authed_request, body_json, create_test_teacher, obtain_test_token,
        setup_test_app,
    };
    use axum::http::Method;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_and_list_teachers() -> Result<()> {
        let (app, _db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                Method::POST,
                "/api/teachers",
                &token,
                json!({"name": "Maria Silva", "pix_key": "maria@bank.example"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status_display"], "Active");

        let response = app
            .oneshot(authed_request(Method::GET, "/api/teachers", &token))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["pix_key"], "maria@bank.example");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_teacher_status() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;

        let response = app
            .oneshot(authed_json_request(
                Method::PATCH,
                &format!("/api/teachers/{}", teacher.id),
                &token,
                json!({"status": "former"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "former");
        assert_eq!(body["status_display"], "Former");
        Ok(())
    }
}
