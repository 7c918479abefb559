//! Invoice handlers
//!
//! Invoice editing is blocked once an invoice is paid; deletion uses the
//! domain guard. The overdue refresh is an explicit sweep endpoint, there
//! is no background job.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{BillingPeriod, CustomerId, InvoiceId};
use domain_ledger::InvoiceStatus;
use infra_db::repositories::invoices::NewInvoice;

use crate::dto::invoice::{
    CreateInvoiceRequest, InvoiceListResponse, InvoiceResponse, RecordPaymentRequest,
    RefreshOverdueResponse, UpdateInvoiceRequest,
};
use crate::dto::ListQuery;
use crate::error::ApiError;
use crate::AppState;

/// Creates a draft invoice with a freshly assigned number
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), ApiError> {
    request.validate()?;

    // The customer must exist; surface 404 rather than an FK conflict.
    let customer_id = CustomerId::from(request.customer_id);
    state.customers().find_by_id(customer_id).await?;

    let period = BillingPeriod::new(request.period_start, request.period_end, request.due_date)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let invoice = state
        .invoices()
        .create(
            NewInvoice {
                customer_id,
                period,
                amount: request.amount,
                description: request.description,
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(&invoice))))
}

/// Lists invoices with paging and aggregate counters
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let repo = state.invoices();
    let invoices = repo.list(query.limit(), query.offset()).await?;
    let stats = repo.list_stats(Utc::now().date_naive()).await?;

    Ok(Json(InvoiceListResponse {
        invoices: invoices.iter().map(InvoiceResponse::from).collect(),
        stats: stats.into(),
    }))
}

/// Gets an invoice by ID
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let invoice = state.invoices().find_by_id(InvoiceId::from(id)).await?;
    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// Updates an invoice's amount or description
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    request.validate()?;

    let repo = state.invoices();
    let mut invoice = repo.find_by_id(InvoiceId::from(id)).await?;

    if invoice.status == InvoiceStatus::Paid {
        return Err(ApiError::Conflict(format!(
            "Cannot modify a paid invoice: {}",
            invoice.invoice_number
        )));
    }

    if let Some(amount) = request.amount {
        invoice.amount = amount;
    }
    if let Some(description) = request.description {
        invoice.description = Some(description);
    }
    invoice.updated_at = Utc::now();
    repo.update(&invoice).await?;

    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// Deletes an invoice; paid invoices are refused
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = state.invoices();
    let invoice = repo.find_by_id(InvoiceId::from(id)).await?;
    invoice.deletable()?;
    repo.delete(invoice.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Dispatches a draft invoice to the customer
pub async fn send_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    let repo = state.invoices();
    let mut invoice = repo.find_by_id(InvoiceId::from(id)).await?;
    invoice.mark_sent(Utc::now())?;
    repo.update(&invoice).await?;

    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// Applies a settlement amount to an invoice (the manual settlement step)
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<InvoiceResponse>, ApiError> {
    request.validate()?;

    let repo = state.invoices();
    let mut invoice = repo.find_by_id(InvoiceId::from(id)).await?;
    invoice.record_payment(request.amount, Utc::now())?;
    repo.update(&invoice).await?;

    Ok(Json(InvoiceResponse::from(&invoice)))
}

/// Sweeps all invoices, marking past-due ones overdue
pub async fn refresh_overdue(
    State(state): State<AppState>,
) -> Result<Json<RefreshOverdueResponse>, ApiError> {
    let now = Utc::now();
    let today = now.date_naive();
    let repo = state.invoices();

    let mut updated = 0;
    for mut invoice in repo.find_all().await? {
        if invoice.refresh_overdue_status(today, now) {
            repo.update(&invoice).await?;
            updated += 1;
        }
    }

    Ok(Json(RefreshOverdueResponse { updated }))
}
