//! Dashboard response DTO

use serde::Serialize;

use domain_ledger::DashboardStats;

use crate::dto::customer::CustomerResponse;
use crate::dto::invoice::InvoiceResponse;
use crate::dto::payment::PaymentResponse;

/// Aggregate statistics plus the latest activity across all three record sets
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub recent_customers: Vec<CustomerResponse>,
    pub recent_invoices: Vec<InvoiceResponse>,
    pub recent_payments: Vec<PaymentResponse>,
}
