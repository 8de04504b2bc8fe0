//! Product endpoints.
//!
//! Filters: `is_active`. Search: name, description. Ordering: name (default),
//! price, created_at.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, PaginatorTrait, QueryFilter, QueryOrder, Select};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::lifecycle;
use crate::core::product::{self, ProductChanges};
use crate::entities::{Product, ProductColumn, ProductModel};
use crate::errors::{Error, Result};

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    is_active: Option<bool>,
}

fn apply_ordering(query: Select<Product>, ordering: Option<&str>) -> Select<Product> {
    match params::parse_ordering(ordering) {
        Some(("name", order)) => query.order_by(ProductColumn::Name, order),
        Some(("price", order)) => query.order_by(ProductColumn::Price, order),
        Some(("created_at", order)) => query.order_by(ProductColumn::CreatedAt, order),
        _ => query.order_by_asc(ProductColumn::Name),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<ProductModel>>> {
    let mut query = lifecycle::select_active::<Product>();
    if let Some(is_active) = list_params.is_active {
        query = query.filter(ProductColumn::IsActive.eq(is_active));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query.filter(
            Condition::any()
                .add(ProductColumn::Name.contains(term))
                .add(ProductColumn::Description.contains(term)),
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
struct ProductPayload {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    duration_months: Option<i32>,
    is_active: Option<bool>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<ProductModel>)> {
    let name = params::required(payload.name, "name")?;
    let price = params::required(payload.price, "price")?;
    let duration_months = params::required(payload.duration_months, "duration_months")?;

    let created = product::create_product(
        &state.db,
        name,
        payload.description,
        price,
        duration_months,
        payload.is_active.unwrap_or(true),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductModel>> {
    product::get_product(&state.db, id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound { entity: "product", id })
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<ProductModel>> {
    let changes = ProductChanges {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        duration_months: payload.duration_months,
        is_active: payload.is_active,
    };
    Ok(Json(product::update_product(&state.db, id, changes).await?))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if product::get_product(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "product", id });
    }
    lifecycle::soft_delete::<Product, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for products.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
}
