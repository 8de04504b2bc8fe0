//! School payment endpoints.
//!
//! Filters: `payment_method`. Search: description. Ordering: value, paid_at
//! (default descending), created_at.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter, QueryOrder, Select};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::lifecycle;
use crate::core::payment::{self, PaymentChanges};
use crate::entities::{Payment, PaymentColumn, PaymentMethod, PaymentModel};
use crate::errors::{Error, Result};

/// Payment wire representation: all fields plus the method label.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    #[serde(flatten)]
    payment: PaymentModel,
    payment_method_display: &'static str,
}

fn to_response(payment: PaymentModel) -> PaymentResponse {
    let payment_method_display = payment.payment_method.display_name();
    PaymentResponse {
        payment,
        payment_method_display,
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    payment_method: Option<PaymentMethod>,
}

fn apply_ordering(query: Select<Payment>, ordering: Option<&str>) -> Select<Payment> {
    match params::parse_ordering(ordering) {
        Some(("value", order)) => query.order_by(PaymentColumn::Value, order),
        Some(("paid_at", order)) => query.order_by(PaymentColumn::PaidAt, order),
        Some(("created_at", order)) => query.order_by(PaymentColumn::CreatedAt, order),
        _ => query.order_by_desc(PaymentColumn::PaidAt),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<PaymentResponse>>> {
    let mut query = lifecycle::select_active::<Payment>();
    if let Some(payment_method) = list_params.payment_method {
        query = query.filter(PaymentColumn::PaymentMethod.eq(payment_method));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query.filter(PaymentColumn::Description.contains(term));
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
struct PaymentPayload {
    payment_method: Option<PaymentMethod>,
    value: Option<Decimal>,
    paid_at: Option<DateTime<Utc>>,
    description: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PaymentPayload>,
) -> Result<(StatusCode, Json<PaymentResponse>)> {
    let payment_method = params::required(payload.payment_method, "payment_method")?;
    let value = params::required(payload.value, "value")?;
    let paid_at = params::required(payload.paid_at, "paid_at")?;

    let created =
        payment::create_payment(&state.db, payment_method, value, paid_at, payload.description)
            .await?;
    Ok((StatusCode::CREATED, Json(to_response(created))))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PaymentResponse>> {
    payment::get_payment(&state.db, id)
        .await?
        .map(|model| Json(to_response(model)))
        .ok_or(Error::NotFound { entity: "payment", id })
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentPayload>,
) -> Result<Json<PaymentResponse>> {
    let changes = PaymentChanges {
        payment_method: payload.payment_method,
        value: payload.value,
        paid_at: payload.paid_at,
        description: payload.description,
    };
    let updated = payment::update_payment(&state.db, id, changes).await?;
    Ok(Json(to_response(updated)))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if payment::get_payment(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "payment", id });
    }
    lifecycle::soft_delete::<Payment, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for payments.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
}
