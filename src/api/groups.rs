//! Class group endpoints.
//!
//! Filters: `teacher`. Search: teacher name. Ordering: scheduled_at
//! (default), created_at. Create/update accept a `students` id list that
//! replaces the membership set.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::group::{self, GroupChanges};
use crate::core::lifecycle;
use crate::entities::{
    StudentsGroup, StudentsGroupColumn, StudentsGroupModel, TeacherColumn,
    students_group as group_entity,
};
use crate::errors::{Error, Result};

/// Group wire representation: all fields plus the teacher's name, the
/// live-member projections, and the member id list.
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    #[serde(flatten)]
    group: StudentsGroupModel,
    teacher_name: String,
    current_students_count: u64,
    students_names: Vec<String>,
    students: Vec<i64>,
}

async fn to_response(db: &DatabaseConnection, group: StudentsGroupModel) -> Result<GroupResponse> {
    let teacher_name = crate::core::teacher::teacher_name(db, group.teacher_id).await?;
    let current_students_count = crate::core::group::current_students_count(db, group.id).await?;
    let students_names = crate::core::group::student_names(db, group.id).await?;
    let students = crate::core::group::student_ids(db, group.id).await?;
    Ok(GroupResponse {
        group,
        teacher_name,
        current_students_count,
        students_names,
        students,
    })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    teacher: Option<i64>,
}

fn apply_ordering(query: Select<StudentsGroup>, ordering: Option<&str>) -> Select<StudentsGroup> {
    match params::parse_ordering(ordering) {
        Some(("scheduled_at", order)) => query.order_by(StudentsGroupColumn::ScheduledAt, order),
        Some(("created_at", order)) => query.order_by(StudentsGroupColumn::CreatedAt, order),
        _ => query.order_by_asc(StudentsGroupColumn::ScheduledAt),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<GroupResponse>>> {
    let mut query = lifecycle::select_active::<StudentsGroup>();
    if let Some(teacher) = list_params.teacher {
        query = query.filter(StudentsGroupColumn::TeacherId.eq(teacher));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query
            .join(JoinType::InnerJoin, group_entity::Relation::Teacher.def())
            .filter(TeacherColumn::Name.contains(term));
    }
    let query = apply_ordering(query, list_params.ordering.as_deref());

    let pager = Pager::from_params(list_params.page, list_params.page_size);
    let paginator = query.paginate(&state.db, pager.page_size);
    let count = paginator.num_items().await?;
    let models = paginator.fetch_page(pager.index()).await?;

    let mut results = Vec::with_capacity(models.len());
    for model in models {
        results.push(to_response(&state.db, model).await?);
    }
    Ok(Json(ListEnvelope { count, results }))
}

#[derive(Debug, Deserialize)]
struct GroupPayload {
    scheduled_at: Option<DateTime<Utc>>,
    #[serde(rename = "teacher")]
    teacher_id: Option<i64>,
    max_students: Option<i32>,
    students: Option<Vec<i64>>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GroupPayload>,
) -> Result<(StatusCode, Json<GroupResponse>)> {
    let scheduled_at = params::required(payload.scheduled_at, "scheduled_at")?;
    let teacher_id = params::required(payload.teacher_id, "teacher")?;

    let created = group::create_group(
        &state.db,
        scheduled_at,
        teacher_id,
        payload.max_students.unwrap_or(10),
        payload.students.unwrap_or_default(),
    )
    .await?;
    let response = to_response(&state.db, created).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GroupResponse>> {
    let group = group::get_group(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "students_group", id })?;
    Ok(Json(to_response(&state.db, group).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GroupPayload>,
) -> Result<Json<GroupResponse>> {
    let changes = GroupChanges {
        scheduled_at: payload.scheduled_at,
        teacher_id: payload.teacher_id,
        max_students: payload.max_students,
        student_ids: payload.students,
    };
    let updated = group::update_group(&state.db, id, changes).await?;
    Ok(Json(to_response(&state.db, updated).await?))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if group::get_group(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "students_group", id });
    }
    lifecycle::soft_delete::<StudentsGroup, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for class groups.
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
    use crate::entities::Student;
    use crate::test_utils::{
        authed_json_request, authed_request, body_json, create_test_student, create_test_teacher,
        obtain_test_token, setup_test_app,
    };
    use axum::http::Method;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_group_member_lifecycle_end_to_end() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;

        // Teacher T and group G with capacity 2
        let teacher = create_test_teacher(&db, "Maria Silva").await?;
        let ana = create_test_student(&db, "Ana").await?;
        let bia = create_test_student(&db, "Bia").await?;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                Method::POST,
                "/api/students-groups",
                &token,
                json!({
                    "scheduled_at": "2024-03-01T14:00:00Z",
                    "teacher": teacher.id,
                    "max_students": 2,
                    "students": [ana.id, bia.id],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let group_id = created["id"].as_i64().unwrap();
        assert_eq!(created["teacher_name"], "Maria Silva");
        assert_eq!(created["current_students_count"], 2);
        assert_eq!(created["students_names"], json!(["Ana", "Bia"]));

        // Soft-delete Ana: the count drops, the membership row stays
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
            .clone()
            .oneshot(authed_request(
                Method::GET,
                &format!("/api/students-groups/{group_id}"),
                &token,
            ))
            .await
            .unwrap();
        let fetched = body_json(response).await;
        assert_eq!(fetched["current_students_count"], 1);
        assert_eq!(fetched["students_names"], json!(["Bia"]));
        assert_eq!(group::raw_membership_count(&db, group_id).await?, 2);

        // Default student listing excludes Ana; the audit path still has her
        let response = app
            .oneshot(authed_request(Method::GET, "/api/students", &token))
            .await
            .unwrap();
        let students = body_json(response).await;
        assert_eq!(students["count"], 1);
        assert_eq!(students["results"][0]["name"], "Bia");
        assert_eq!(lifecycle::list_all::<Student>(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_capacity_out_of_range_is_400() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;

        let response = app
            .oneshot(authed_json_request(
                Method::POST,
                "/api/students-groups",
                &token,
                json!({
                    "scheduled_at": "2024-03-01T14:00:00Z",
                    "teacher": teacher.id,
                    "max_students": 51,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["errors"]["max_students"].is_array());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_membership() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;
        let ana = create_test_student(&db, "Ana").await?;
        let bia = create_test_student(&db, "Bia").await?;
        let group = group::create_group(&db, Utc::now(), teacher.id, 10, vec![ana.id]).await?;

        let response = app
            .oneshot(authed_json_request(
                Method::PATCH,
                &format!("/api/students-groups/{}", group.id),
                &token,
                json!({"students": [bia.id]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["students"], json!([bia.id]));
        assert_eq!(body["students_names"], json!(["Bia"]));
        Ok(())
    }
}
