//! Invoice DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use domain_ledger::{Invoice, InvoiceStatus};
use infra_db::repositories::invoices::InvoiceListStats;

use super::{non_negative_amount, positive_amount};

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_invoice_dates"))]
pub struct CreateInvoiceRequest {
    pub customer_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(custom(function = "non_negative_amount"))]
    pub amount: Decimal,
    pub description: Option<String>,
}

fn validate_invoice_dates(request: &CreateInvoiceRequest) -> Result<(), ValidationError> {
    if request.period_end <= request.period_start {
        return Err(ValidationError::new("period_end_not_after_start"));
    }
    if request.due_date <= request.period_end {
        return Err(ValidationError::new("due_date_not_after_period_end"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    #[validate(custom(function = "non_negative_amount"))]
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub invoice_number: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_balance: Decimal,
    pub status: InvoiceStatus,
    pub description: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.into(),
            customer_id: invoice.customer_id.into(),
            invoice_number: invoice.invoice_number.clone(),
            period_start: invoice.period.start(),
            period_end: invoice.period.end(),
            due_date: invoice.period.due_date(),
            amount: invoice.amount,
            paid_amount: invoice.paid_amount,
            remaining_balance: invoice.remaining_balance(),
            status: invoice.status,
            description: invoice.description.clone(),
            sent_at: invoice.sent_at,
            paid_at: invoice.paid_at,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

/// Aggregate counters shown above the invoice list
#[derive(Debug, Serialize)]
pub struct InvoiceStatsResponse {
    pub total: i64,
    pub unpaid_count: i64,
    pub overdue_count: i64,
    pub unpaid_amount: Decimal,
}

impl From<InvoiceListStats> for InvoiceStatsResponse {
    fn from(stats: InvoiceListStats) -> Self {
        Self {
            total: stats.total,
            unpaid_count: stats.unpaid_count,
            overdue_count: stats.overdue_count,
            unpaid_amount: stats.unpaid_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceResponse>,
    pub stats: InvoiceStatsResponse,
}

/// Result of an overdue refresh sweep
#[derive(Debug, Serialize)]
pub struct RefreshOverdueResponse {
    pub updated: usize,
}
