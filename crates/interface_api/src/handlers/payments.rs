//! Payment handlers
//!
//! Confirming a payment stamps the acting operator from the JWT claims and
//! deliberately leaves the linked invoice untouched; settlement happens via
//! the invoice's record-payment endpoint.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{CustomerId, InvoiceId, PaymentId};
use infra_db::repositories::payments::NewPayment;

use crate::auth::Claims;
use crate::dto::payment::{
    CreatePaymentRequest, PaymentListResponse, PaymentResponse, UpdatePaymentRequest,
};
use crate::dto::ListQuery;
use crate::error::ApiError;
use crate::AppState;

/// Records a pending payment with a freshly assigned reference
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    request.validate()?;

    let customer_id = CustomerId::from(request.customer_id);
    state.customers().find_by_id(customer_id).await?;

    // A linked invoice must exist and belong to the same customer.
    let invoice_id = match request.invoice_id {
        Some(id) => {
            let invoice = state.invoices().find_by_id(InvoiceId::from(id)).await?;
            if invoice.customer_id != customer_id {
                return Err(ApiError::Validation(format!(
                    "invoice {} does not belong to customer {}",
                    invoice.invoice_number, customer_id
                )));
            }
            Some(invoice.id)
        }
        None => None,
    };

    let payment = state
        .payments()
        .create(
            NewPayment {
                customer_id,
                invoice_id,
                amount: request.amount,
                method: request.method,
                payment_date: request.payment_date,
                notes: request.notes,
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(&payment))))
}

/// Lists payments with paging and aggregate counters
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaymentListResponse>, ApiError> {
    let repo = state.payments();
    let payments = repo.list(query.limit(), query.offset()).await?;
    let stats = repo.list_stats().await?;

    Ok(Json(PaymentListResponse {
        payments: payments.iter().map(PaymentResponse::from).collect(),
        stats: stats.into(),
    }))
}

/// Gets a payment by ID
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let payment = state.payments().find_by_id(PaymentId::from(id)).await?;
    Ok(Json(PaymentResponse::from(&payment)))
}

/// Updates a payment; confirmed payments are locked
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    request.validate()?;

    let repo = state.payments();
    let mut payment = repo.find_by_id(PaymentId::from(id)).await?;
    payment.editable()?;
    request.apply(&mut payment, Utc::now());
    repo.update(&payment).await?;

    Ok(Json(PaymentResponse::from(&payment)))
}

/// Deletes a payment; confirmed payments are refused
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = state.payments();
    let payment = repo.find_by_id(PaymentId::from(id)).await?;
    payment.editable()?;
    repo.delete(payment.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Confirms a payment, stamping the acting operator
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let operator = claims.operator_id().map_err(|_| ApiError::Unauthorized)?;

    let repo = state.payments();
    let mut payment = repo.find_by_id(PaymentId::from(id)).await?;
    payment.confirm(operator, Utc::now())?;
    repo.update(&payment).await?;

    Ok(Json(PaymentResponse::from(&payment)))
}

/// Marks a payment as failed
pub async fn fail_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let repo = state.payments();
    let mut payment = repo.find_by_id(PaymentId::from(id)).await?;
    payment.fail(Utc::now())?;
    repo.update(&payment).await?;

    Ok(Json(PaymentResponse::from(&payment)))
}
