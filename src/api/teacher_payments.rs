//! Teacher payment endpoints.
//!
//! Filters: `teacher`, `payment_method`. Search: description, teacher name.
//! Ordering: value, paid_at (default descending), created_at.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::lifecycle;
use crate::core::teacher_payment::{self, TeacherPaymentChanges};
use crate::entities::{
    PaymentMethod, TeacherColumn, TeacherPayment, TeacherPaymentColumn, TeacherPaymentModel,
    teacher_payment as teacher_payment_entity,
};
use crate::errors::{Error, Result};

/// Teacher payment wire representation: all fields plus the teacher's name
/// and the method label.
#[derive(Debug, Serialize)]
pub struct TeacherPaymentResponse {
    #[serde(flatten)]
    payment: TeacherPaymentModel,
    teacher_name: String,
    payment_method_display: &'static str,
}

async fn to_response(
    db: &DatabaseConnection,
    payment: TeacherPaymentModel,
) -> Result<TeacherPaymentResponse> {
    let teacher_name = crate::core::teacher::teacher_name(db, payment.teacher_id).await?;
    let payment_method_display = payment.payment_method.display_name();
    Ok(TeacherPaymentResponse {
        payment,
        teacher_name,
        payment_method_display,
    })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    teacher: Option<i64>,
    payment_method: Option<PaymentMethod>,
}

fn apply_ordering(
    query: Select<TeacherPayment>,
    ordering: Option<&str>,
) -> Select<TeacherPayment> {
    match params::parse_ordering(ordering) {
        Some(("value", order)) => query.order_by(TeacherPaymentColumn::Value, order),
        Some(("paid_at", order)) => query.order_by(TeacherPaymentColumn::PaidAt, order),
        Some(("created_at", order)) => query.order_by(TeacherPaymentColumn::CreatedAt, order),
        _ => query.order_by_desc(TeacherPaymentColumn::PaidAt),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<TeacherPaymentResponse>>> {
    let mut query = lifecycle::select_active::<TeacherPayment>();
    if let Some(teacher) = list_params.teacher {
        query = query.filter(TeacherPaymentColumn::TeacherId.eq(teacher));
    }
    if let Some(payment_method) = list_params.payment_method {
        query = query.filter(TeacherPaymentColumn::PaymentMethod.eq(payment_method));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query
            .join(
                JoinType::InnerJoin,
                teacher_payment_entity::Relation::Teacher.def(),
            )
            .filter(
                Condition::any()
                    .add(TeacherPaymentColumn::Description.contains(term))
                    .add(TeacherColumn::Name.contains(term)),
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
struct TeacherPaymentPayload {
    #[serde(rename = "teacher")]
    teacher_id: Option<i64>,
    value: Option<Decimal>,
    paid_at: Option<DateTime<Utc>>,
    payment_method: Option<PaymentMethod>,
    description: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TeacherPaymentPayload>,
) -> Result<(StatusCode, Json<TeacherPaymentResponse>)> {
    let teacher_id = params::required(payload.teacher_id, "teacher")?;
    let value = params::required(payload.value, "value")?;
    let paid_at = params::required(payload.paid_at, "paid_at")?;
    let payment_method = params::required(payload.payment_method, "payment_method")?;

    let created = teacher_payment::create_teacher_payment(
        &state.db,
        teacher_id,
        value,
        paid_at,
        payment_method,
        payload.description,
    )
    .await?;
    let response = to_response(&state.db, created).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeacherPaymentResponse>> {
    let payment = teacher_payment::get_teacher_payment(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "teacher_payment", id })?;
    Ok(Json(to_response(&state.db, payment).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TeacherPaymentPayload>,
) -> Result<Json<TeacherPaymentResponse>> {
    let changes = TeacherPaymentChanges {
        teacher_id: payload.teacher_id,
        value: payload.value,
        paid_at: payload.paid_at,
        payment_method: payload.payment_method,
        description: payload.description,
    };
    let updated = teacher_payment::update_teacher_payment(&state.db, id, changes).await?;
    Ok(Json(to_response(&state.db, updated).await?))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if teacher_payment::get_teacher_payment(&state.db, id)
        .await?
        .is_none()
    {
        return Err(Error::NotFound { entity: "teacher_payment", id });
    }
    lifecycle::soft_delete::<TeacherPayment, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for teacher payments.
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
        authed_json_request, authed_request, body_json, create_test_teacher,
        create_test_teacher_payment, obtain_test_token, setup_test_app,
    };
    use axum::http::Method;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_resolves_teacher_name() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;
        let teacher = create_test_teacher(&db, "Maria Silva").await?;

        let response = app
            .oneshot(authed_json_request(
                Method::POST,
                "/api/teacher-payments",
                &token,
                json!({
                    "teacher": teacher.id,
                    "value": "2500.00",
                    "paid_at": "2024-03-01T10:00:00Z",
                    "payment_method": "pix",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["teacher"], teacher.id);
        assert_eq!(body["teacher_name"], "Maria Silva");
        assert_eq!(body["payment_method_display"], "PIX");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_teacher_reference_is_400() -> Result<()> {
        let (app, _db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;

        let response = app
            .oneshot(authed_json_request(
                Method::POST,
                "/api/teacher-payments",
                &token,
                json!({
                    "teacher": 999,
                    "value": "2500.00",
                    "paid_at": "2024-03-01T10:00:00Z",
                    "payment_method": "pix",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["errors"]["teacher"].is_array());
        Ok(())
    }

    #[tokio::test]
    async fn test_teacher_filter_and_search_by_teacher_name() -> Result<()> {
        let (app, db) = setup_test_app().await?;
        let token = obtain_test_token(&app).await;
        let maria = create_test_teacher(&db, "Maria Silva").await?;
        let joao = create_test_teacher(&db, "Joao Santos").await?;
        create_test_teacher_payment(&db, maria.id).await?;
        create_test_teacher_payment(&db, joao.id).await?;

        let response = app
            .clone()
            .oneshot(authed_request(
                Method::GET,
                &format!("/api/teacher-payments?teacher={}", maria.id),
                &token,
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["teacher_name"], "Maria Silva");

        let response = app
            .oneshot(authed_request(
                Method::GET,
                "/api/teacher-payments?search=Santos",
                &token,
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["teacher_name"], "Joao Santos");
        Ok(())
    }
}
