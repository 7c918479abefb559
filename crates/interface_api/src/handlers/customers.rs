//! Customer handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use core_kernel::CustomerId;

use crate::dto::customer::{
    CreateCustomerRequest, CustomerDetailResponse, CustomerResponse, UpdateCustomerRequest,
};
use crate::dto::ListQuery;
use crate::error::ApiError;
use crate::AppState;

/// Registers a new subscriber
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    request.validate()?;

    let customer = request.into_customer(Utc::now());
    state.customers().insert(&customer).await?;

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(&customer))))
}

/// Lists customers with paging
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state
        .customers()
        .list(query.limit(), query.offset())
        .await?;

    Ok(Json(customers.iter().map(CustomerResponse::from).collect()))
}

/// Gets a customer with their derived account figures
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerDetailResponse>, ApiError> {
    let id = CustomerId::from(id);
    let customer = state.customers().find_by_id(id).await?;
    let invoices = state.invoices().list_by_customer(id).await?;
    let payments = state.payments().list_by_customer(id).await?;

    let balance = customer.balance(&invoices);
    let total_paid = customer.total_paid(&payments);

    Ok(Json(CustomerDetailResponse {
        customer: CustomerResponse::from(&customer),
        balance,
        total_paid,
    }))
}

/// Updates a customer record
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    request.validate()?;

    let repo = state.customers();
    let mut customer = repo.find_by_id(CustomerId::from(id)).await?;
    request.apply(&mut customer, Utc::now());
    repo.update(&customer).await?;

    Ok(Json(CustomerResponse::from(&customer)))
}

/// Deletes a customer; their invoices and payments go with them
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.customers().delete(CustomerId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
