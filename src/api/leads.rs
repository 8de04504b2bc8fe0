//! Sales lead endpoints.
//!
//! Search: name, goals, interests, email. Ordering: name, birth_date,
//! created_at (default descending).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Condition, PaginatorTrait, QueryFilter, QueryOrder, Select};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::lead::{self, LeadChanges};
use crate::core::lifecycle;
use crate::entities::{Lead, LeadColumn, LeadModel};
use crate::errors::{Error, Result};

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
}

fn apply_ordering(query: Select<Lead>, ordering: Option<&str>) -> Select<Lead> {
    match params::parse_ordering(ordering) {
        Some(("name", order)) => query.order_by(LeadColumn::Name, order),
        Some(("birth_date", order)) => query.order_by(LeadColumn::BirthDate, order),
        Some(("created_at", order)) => query.order_by(LeadColumn::CreatedAt, order),
        _ => query.order_by_desc(LeadColumn::CreatedAt),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<LeadModel>>> {
    let mut query = lifecycle::select_active::<Lead>();
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query.filter(
            Condition::any()
                .add(LeadColumn::Name.contains(term))
                .add(LeadColumn::Goals.contains(term))
                .add(LeadColumn::Interests.contains(term))
                .add(LeadColumn::Email.contains(term)),
        );
    }
    let query = apply_ordering(query, list_params.ordering.as_deref());

    let pager = Pager::from_params(list_params.page, list_params.page_size);
    let paginator = query.paginate(&state.db, pager.page_size);
    let count = paginator.num_items().await?;
    let results = paginator.fetch_page(pager.index()).await?;
    Ok(Json(ListEnvelope { count, results }))
}

#[derive(Debug, Deserialize)]
struct LeadPayload {
    name: Option<String>,
    goals: Option<String>,
    birth_date: Option<NaiveDate>,
    interests: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<LeadPayload>,
) -> Result<(StatusCode, Json<LeadModel>)> {
    let name = params::required(payload.name, "name")?;
    let goals = params::required(payload.goals, "goals")?;
    let birth_date = params::required(payload.birth_date, "birth_date")?;

    let created = lead::create_lead(
        &state.db,
        name,
        goals,
        birth_date,
        payload.interests,
        payload.email,
        payload.phone,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn retrieve(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<LeadModel>> {
    lead::get_lead(&state.db, id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound { entity: "lead", id })
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<LeadPayload>,
) -> Result<Json<LeadModel>> {
    let changes = LeadChanges {
        name: payload.name,
        goals: payload.goals,
        birth_date: payload.birth_date,
        interests: payload.interests,
        email: payload.email,
        phone: payload.phone,
    };
    Ok(Json(lead::update_lead(&state.db, id, changes).await?))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if lead::get_lead(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "lead", id });
    }
    lifecycle::soft_delete::<Lead, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for leads.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
}
