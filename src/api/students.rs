//! Student endpoints.
//!
//! Filters: `status`. Search: name. Ordering: name (default), birth_date,
//! created_at.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter, QueryOrder, Select};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::lifecycle;
use crate::core::student::{self, StudentChanges};
use crate::entities::{Student, StudentColumn, StudentModel, StudentStatus};
use crate::errors::{Error, Result};

/// Student wire representation: all fields plus the status label.
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    #[serde(flatten)]
    student: StudentModel,
    status_display: &'static str,
}

fn to_response(student: StudentModel) -> StudentResponse {
    let status_display = student.status.display_name();
    StudentResponse {
        student,
        status_display,
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    status: Option<StudentStatus>,
}

fn apply_ordering(query: Select<Student>, ordering: Option<&str>) -> Select<Student> {
    match params::parse_ordering(ordering) {
        Some(("name", order)) => query.order_by(StudentColumn::Name, order),
        Some(("birth_date", order)) => query.order_by(StudentColumn::BirthDate, order),
        Some(("created_at", order)) => query.order_by(StudentColumn::CreatedAt, order),
        _ => query.order_by_asc(StudentColumn::Name),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<StudentResponse>>> {
    let mut query = lifecycle::select_active::<Student>();
    if let Some(status) = list_params.status {
        query = query.filter(StudentColumn::Status.eq(status));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query.filter(StudentColumn::Name.contains(term));
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
struct StudentPayload {
    name: Option<String>,
    birth_date: Option<NaiveDate>,
    extra_info: Option<String>,
    status: Option<StudentStatus>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<StudentPayload>,
) -> Result<(StatusCode, Json<StudentResponse>)> {
    let name = params::required(payload.name, "name")?;
    let birth_date = params::required(payload.birth_date, "birth_date")?;

    let created = student::create_student(
        &state.db,
        name,
        birth_date,
        payload.extra_info,
        payload.status.unwrap_or(StudentStatus::Active),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(to_response(created))))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StudentResponse>> {
    student::get_student(&state.db, id)
        .await?
        .map(|model| Json(to_response(model)))
        .ok_or(Error::NotFound { entity: "student", id })
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<StudentResponse>> {
    let changes = StudentChanges {
        name: payload.name,
        birth_date: payload.birth_date,
        extra_info: payload.extra_info,
        status: payload.status,
    };
    let updated = student::update_student(&state.db, id, changes).await?;
    Ok(Json(to_response(updated)))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if student::get_student(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "student", id });
    }
    lifecycle::soft_delete::<Student, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for students.
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
        authed_json_request, authed_request, body_json, create_test_student, obtain_test_token,
        setup_test_app,
    };
    use axum::http::Method;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_student_with_status_display() -> Result<()> {
        let (app, _db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;

        let response = app
            .oneshot(authed_json_request(
                Method::POST,
                "/api/students",
                &token,
                json!({
                    "name": "John Doe",
                    "birth_date": "2000-01-01",
                    "extra_info": "Likes programming",
                    "status": "active",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "active");
        assert_eq!(body["status_display"], "Active");
        Ok(())
    }

    #[tokio::test]
    async fn test_status_filter() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;

        create_test_student(&db, "Active Ana").await?;
        let former = create_test_student(&db, "Former Fred").await?;
        student::update_student(
            &db,
            former.id,
            StudentChanges {
                status: Some(StudentStatus::Former),
                ..Default::default()
            },
        )
        .await?;

        let response = app
            .oneshot(authed_request(
                Method::GET,
                "/api/students?status=former",
                &token,
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Former Fred");
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_deleted_student_leaves_default_listing() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;

        let ana = create_test_student(&db, "Ana").await?;
        create_test_student(&db, "Bia").await?;

        let response = app
            .clone()
            .oneshot(authed_request(
                Method::DELETE,
                &format!("/api/students/{}", ana.id),
                &token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(authed_request(Method::GET, "/api/students", &token))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Bia");

        // Still physically present for the audit paths
        assert_eq!(lifecycle::list_all::<Student>(&db).await?.len(), 2);
        assert_eq!(lifecycle::list_deleted::<Student>(&db).await?.len(), 1);
        Ok(())
    }
}
