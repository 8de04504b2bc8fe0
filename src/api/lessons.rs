//! Lesson endpoints.
//!
//! Filters: `teacher`, `students_group`. Search: teacher name, notes.
//! Ordering: occurred_at (default descending), created_at.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::lesson::{self, LessonChanges};
use crate::core::lifecycle;
use crate::entities::{Lesson, LessonColumn, LessonModel, TeacherColumn, lesson as lesson_entity};
use crate::errors::{Error, Result};

/// Lesson wire representation: all fields plus the teacher's name and a
/// textual summary of the owning group.
#[derive(Debug, Serialize)]
pub struct LessonResponse {
    #[serde(flatten)]
    lesson: LessonModel,
    teacher_name: String,
    group_info: String,
}

async fn to_response(db: &DatabaseConnection, lesson: LessonModel) -> Result<LessonResponse> {
    let teacher_name = crate::core::teacher::teacher_name(db, lesson.teacher_id).await?;
    let group_info = crate::core::group::group_info(db, lesson.students_group_id).await?;
    Ok(LessonResponse {
        lesson,
        teacher_name,
        group_info,
    })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    teacher: Option<i64>,
    students_group: Option<i64>,
}

fn apply_ordering(query: Select<Lesson>, ordering: Option<&str>) -> Select<Lesson> {
    match params::parse_ordering(ordering) {
        Some(("occurred_at", order)) => query.order_by(LessonColumn::OccurredAt, order),
        Some(("created_at", order)) => query.order_by(LessonColumn::CreatedAt, order),
        _ => query.order_by_desc(LessonColumn::OccurredAt),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<LessonResponse>>> {
    let mut query = lifecycle::select_active::<Lesson>();
    if let Some(teacher) = list_params.teacher {
        query = query.filter(LessonColumn::TeacherId.eq(teacher));
    }
    if let Some(students_group) = list_params.students_group {
        query = query.filter(LessonColumn::StudentsGroupId.eq(students_group));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query
            .join(JoinType::InnerJoin, lesson_entity::Relation::Teacher.def())
            .filter(
                Condition::any()
                    .add(TeacherColumn::Name.contains(term))
                    .add(LessonColumn::Notes.contains(term)),
            );
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
struct LessonPayload {
    #[serde(rename = "students_group")]
    students_group_id: Option<i64>,
    #[serde(rename = "teacher")]
    teacher_id: Option<i64>,
    occurred_at: Option<DateTime<Utc>>,
    notes: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<LessonPayload>,
) -> Result<(StatusCode, Json<LessonResponse>)> {
    let students_group_id = params::required(payload.students_group_id, "students_group")?;
    let teacher_id = params::required(payload.teacher_id, "teacher")?;
    let occurred_at = params::required(payload.occurred_at, "occurred_at")?;

    let created = lesson::create_lesson(
        &state.db,
        students_group_id,
        teacher_id,
        occurred_at,
        payload.notes,
    )
    .await?;
    let response = to_response(&state.db, created).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LessonResponse>> {
    let lesson = lesson::get_lesson(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "lesson", id })?;
    Ok(Json(to_response(&state.db, lesson).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<LessonPayload>,
) -> Result<Json<LessonResponse>> {
    let changes = LessonChanges {
        students_group_id: payload.students_group_id,
        teacher_id: payload.teacher_id,
        occurred_at: payload.occurred_at,
        notes: payload.notes,
    };
    let updated = lesson::update_lesson(&state.db, id, changes).await?;
    Ok(Json(to_response(&state.db, updated).await?))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if lesson::get_lesson(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "lesson", id });
    }
    lifecycle::soft_delete::<Lesson, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for lessons.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
}
