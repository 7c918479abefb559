//! Dashboard handler

use axum::{extract::State, Json};
use chrono::Utc;

use domain_ledger::aggregate_dashboard_stats;

use crate::dto::customer::CustomerResponse;
use crate::dto::dashboard::DashboardResponse;
use crate::dto::invoice::InvoiceResponse;
use crate::dto::payment::PaymentResponse;
use crate::error::ApiError;
use crate::AppState;

const RECENT_LIMIT: usize = 5;

/// Computes the dashboard statistics fresh from the full record set
///
/// Also surfaces the five latest customers, invoices, and payments. The
/// record sets come back newest first, so the head of each is the recent
/// activity.
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let customers = state.customers().find_all().await?;
    let invoices = state.invoices().find_all().await?;
    let payments = state.payments().find_all().await?;

    let stats = aggregate_dashboard_stats(
        &customers,
        &invoices,
        &payments,
        Utc::now().date_naive(),
    );

    Ok(Json(DashboardResponse {
        stats,
        recent_customers: customers
            .iter()
            .take(RECENT_LIMIT)
            .map(CustomerResponse::from)
            .collect(),
        recent_invoices: invoices
            .iter()
            .take(RECENT_LIMIT)
            .map(InvoiceResponse::from)
            .collect(),
        recent_payments: payments
            .iter()
            .take(RECENT_LIMIT)
            .map(PaymentResponse::from)
            .collect(),
    }))
}
