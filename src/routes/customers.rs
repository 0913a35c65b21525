use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::models::{Customer, CustomerId};
use crate::routes::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/getAllCustomer", get(get_all_customers))
        .route("/createCustomer", post(create_customer))
        .route("/bulkLoad", post(bulk_load_customers))
        .route("/bulkUpdate", put(bulk_update_customers))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// GET /customers/getAllCustomer - List every customer.
async fn get_all_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.customers.get_all_customers().await?;
    Ok(Json(customers))
}

/// GET /customers/{id} - Fetch one customer.
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>, ApiError> {
    state
        .customers
        .get_customer_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// POST /customers/createCustomer - Create a customer; the id is assigned by storage.
async fn create_customer(
    State(state): State<AppState>,
    Json(candidate): Json<Customer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let created = state.customers.create_customer(candidate).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /customers/{id} - Replace an existing customer.
async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(replacement): Json<Customer>,
) -> Result<Json<Customer>, ApiError> {
    state
        .customers
        .update_customer(id, replacement)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// DELETE /customers/{id}
async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<StatusCode, ApiError> {
    if state.customers.delete_customer(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// POST /customers/bulkLoad - Create a batch of customers.
async fn bulk_load_customers(
    State(state): State<AppState>,
    Json(candidates): Json<Vec<Customer>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let saved = state.customers.bulk_load_customers(candidates).await?;
    Ok(Json(saved))
}

/// PUT /customers/bulkUpdate - Merge a batch into existing customers.
/// The response echoes the request body.
async fn bulk_update_customers(
    State(state): State<AppState>,
    Json(updates): Json<Vec<Customer>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let echoed = state.customers.bulk_update_customers(updates).await?;
    Ok(Json(echoed))
}
