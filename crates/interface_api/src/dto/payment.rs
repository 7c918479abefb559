//! Payment DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::InvoiceId;
use domain_ledger::{Payment, PaymentMethod, PaymentStatus};
use infra_db::repositories::payments::PaymentListStats;

use super::positive_amount;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub customer_id: Uuid,
    /// Omit for a general payment against the customer's account
    pub invoice_id: Option<Uuid>,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentRequest {
    #[validate(custom(function = "positive_amount"))]
    pub amount: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub payment_date: Option<NaiveDate>,
    pub invoice_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl UpdatePaymentRequest {
    /// Applies the update to an existing payment record
    pub fn apply(self, payment: &mut Payment, now: DateTime<Utc>) {
        if let Some(amount) = self.amount {
            payment.amount = amount;
        }
        if let Some(method) = self.method {
            payment.method = method;
        }
        if let Some(date) = self.payment_date {
            payment.payment_date = date;
        }
        if let Some(invoice_id) = self.invoice_id {
            payment.invoice_id = Some(InvoiceId::from(invoice_id));
        }
        if let Some(notes) = self.notes {
            payment.notes = Some(notes);
        }
        payment.updated_at = now;
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub payment_reference: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
    pub status: PaymentStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.into(),
            customer_id: payment.customer_id.into(),
            invoice_id: payment.invoice_id.map(Into::into),
            payment_reference: payment.payment_reference.clone(),
            amount: payment.amount,
            method: payment.method,
            payment_date: payment.payment_date,
            notes: payment.notes.clone(),
            status: payment.status,
            confirmed_at: payment.confirmed_at,
            confirmed_by: payment.confirmed_by.map(Into::into),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

/// Aggregate counters shown above the payment list
#[derive(Debug, Serialize)]
pub struct PaymentStatsResponse {
    pub total: i64,
    pub pending_count: i64,
    pub confirmed_count: i64,
    pub confirmed_amount: Decimal,
}

impl From<PaymentListStats> for PaymentStatsResponse {
    fn from(stats: PaymentListStats) -> Self {
        Self {
            total: stats.total,
            pending_count: stats.pending_count,
            confirmed_count: stats.confirmed_count,
            confirmed_amount: stats.confirmed_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentResponse>,
    pub stats: PaymentStatsResponse,
}
