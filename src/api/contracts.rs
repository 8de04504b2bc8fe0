//! Enrollment contract endpoints.
//!
//! Filters: `student`, `product`. Search: student name, product name.
//! Ordering: created_at (default descending).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::api::params::{self, ListEnvelope, Pager};
use crate::core::contract::{self, ContractChanges};
use crate::core::lifecycle;
use crate::entities::{
    Contract, ContractColumn, ContractModel, ProductColumn, StudentColumn, contract as contract_entity,
};
use crate::errors::{Error, Result};

/// Contract wire representation: all fields plus both display names.
#[derive(Debug, Serialize)]
pub struct ContractResponse {
    #[serde(flatten)]
    contract: ContractModel,
    student_name: String,
    product_name: String,
}

async fn to_response(
    db: &DatabaseConnection,
    contract: ContractModel,
) -> Result<ContractResponse> {
    let student_name = crate::core::student::student_name(db, contract.student_id).await?;
    let product_name = crate::core::product::product_name(db, contract.product_id).await?;
    Ok(ContractResponse {
        contract,
        student_name,
        product_name,
    })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u64>,
    page_size: Option<u64>,
    search: Option<String>,
    ordering: Option<String>,
    student: Option<i64>,
    product: Option<i64>,
}

fn apply_ordering(query: Select<Contract>, ordering: Option<&str>) -> Select<Contract> {
    match params::parse_ordering(ordering) {
        Some(("created_at", order)) => query.order_by(ContractColumn::CreatedAt, order),
        _ => query.order_by_desc(ContractColumn::CreatedAt),
    }
}

async fn list(
    State(state): State<AppState>,
    Query(list_params): Query<ListParams>,
) -> Result<Json<ListEnvelope<ContractResponse>>> {
    let mut query = lifecycle::select_active::<Contract>();
    if let Some(student) = list_params.student {
        query = query.filter(ContractColumn::StudentId.eq(student));
    }
    if let Some(product) = list_params.product {
        query = query.filter(ContractColumn::ProductId.eq(product));
    }
    if let Some(term) = params::search_term(list_params.search.as_deref()) {
        query = query
            .join(JoinType::InnerJoin, contract_entity::Relation::Student.def())
            .join(JoinType::InnerJoin, contract_entity::Relation::Product.def())
            .filter(
                Condition::any()
                    .add(StudentColumn::Name.contains(term))
                    .add(ProductColumn::Name.contains(term)),
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
struct ContractPayload {
    #[serde(rename = "student")]
    student_id: Option<i64>,
    #[serde(rename = "product")]
    product_id: Option<i64>,
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ContractPayload>,
) -> Result<(StatusCode, Json<ContractResponse>)> {
    let student_id = params::required(payload.student_id, "student")?;
    let product_id = params::required(payload.product_id, "product")?;

    let created = contract::create_contract(&state.db, student_id, product_id).await?;
    let response = to_response(&state.db, created).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContractResponse>> {
    let contract = contract::get_contract(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "contract", id })?;
    Ok(Json(to_response(&state.db, contract).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ContractPayload>,
) -> Result<Json<ContractResponse>> {
    let changes = ContractChanges {
        student_id: payload.student_id,
        product_id: payload.product_id,
    };
    let updated = contract::update_contract(&state.db, id, changes).await?;
    Ok(Json(to_response(&state.db, updated).await?))
}

async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    if contract::get_contract(&state.db, id).await?.is_none() {
        return Err(Error::NotFound { entity: "contract", id });
    }
    lifecycle::soft_delete::<Contract, _>(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Collection and item routes for contracts.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route(
            "/:id",
            get(retrieve).put(update).patch(update).delete(destroy),
        )
}
