//! Invoice lifecycle and balance rules
//!
//! An invoice covers a billing period, carries a total `amount` and a running
//! `paid_amount`, and moves through draft → sent → paid/overdue/cancelled.
//! Overdue is both a derived predicate (fresh, from `due_date`) and a stored
//! status (written only when [`Invoice::refresh_overdue_status`] is invoked).
//! The two can disagree until the refresh runs; aggregate queries always use
//! the fresh predicate.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{BillingPeriod, CalendarMonth, CustomerId, InvoiceId};

use crate::error::LedgerError;

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Invoice is being drafted
    Draft,
    /// Invoice has been dispatched to the customer
    Sent,
    /// Fully settled
    Paid,
    /// Past due date (stored form; see module docs)
    Overdue,
    /// Cancelled/voided
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

/// A postpaid invoice for a subscriber's billing period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Human-readable invoice number (INV-YYYYMM-NNNN, unique)
    pub invoice_number: String,
    /// Covered date range and due date
    pub period: BillingPeriod,
    /// Invoice total
    pub amount: Decimal,
    /// Amount already paid against this invoice
    pub paid_amount: Decimal,
    /// Status
    pub status: InvoiceStatus,
    /// Description/notes
    pub description: Option<String>,
    /// When the invoice was sent to the customer
    pub sent_at: Option<DateTime<Utc>>,
    /// When the invoice was fully paid
    pub paid_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new draft invoice with nothing paid yet
    pub fn new(
        customer_id: CustomerId,
        invoice_number: impl Into<String>,
        period: BillingPeriod,
        amount: Decimal,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InvoiceId::new_v7(),
            customer_id,
            invoice_number: invoice_number.into(),
            period,
            amount,
            paid_amount: Decimal::ZERO,
            status: InvoiceStatus::Draft,
            description,
            sent_at: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the balance still owed: amount − paid_amount
    pub fn remaining_balance(&self) -> Decimal {
        self.amount - self.paid_amount
    }

    /// Returns true once paid_amount has reached amount
    pub fn is_fully_paid(&self) -> bool {
        self.paid_amount >= self.amount
    }

    /// Derived overdue predicate: past due AND in a billable status
    ///
    /// Draft, paid, and cancelled invoices are never overdue, regardless of
    /// their due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.period.due_date() < today
            && matches!(self.status, InvoiceStatus::Sent | InvoiceStatus::Overdue)
    }

    /// Unpaid predicate used by aggregate filtering
    pub fn is_unpaid(&self) -> bool {
        matches!(self.status, InvoiceStatus::Sent | InvoiceStatus::Overdue)
            && self.amount > self.paid_amount
    }

    /// Writes the overdue status if the invoice is past due while still
    /// sent or draft
    ///
    /// This is an explicit, externally triggered recomputation; there is no
    /// background sweep. Returns true if the status changed (the caller is
    /// responsible for persisting it). Idempotent: a second application is a
    /// no-op.
    pub fn refresh_overdue_status(&mut self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        if self.period.due_date() < today
            && matches!(self.status, InvoiceStatus::Sent | InvoiceStatus::Draft)
        {
            self.status = InvoiceStatus::Overdue;
            self.updated_at = now;
            true
        } else {
            false
        }
    }

    /// Dispatches the invoice: draft → sent, stamping sent_at
    pub fn mark_sent(&mut self, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.status != InvoiceStatus::Draft {
            return Err(LedgerError::InvalidTransition(format!(
                "invoice {} is {} and cannot be sent",
                self.invoice_number,
                self.status.as_str()
            )));
        }
        self.status = InvoiceStatus::Sent;
        self.sent_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Applies a settlement amount to this invoice (the manual step)
    ///
    /// Confirming a payment does not reach into the invoice; an operator
    /// applies the amount here explicitly. Marks the invoice paid once fully
    /// settled. paid_amount may exceed amount; overpayment is not rejected.
    pub fn record_payment(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "settlement amount must be positive, got {amount}"
            )));
        }
        self.paid_amount += amount;
        self.updated_at = now;

        if self.is_fully_paid() && self.status != InvoiceStatus::Paid {
            self.status = InvoiceStatus::Paid;
            self.paid_at = Some(now);
        }
        Ok(())
    }

    /// Deletion guard: paid invoices must never be deleted
    pub fn deletable(&self) -> Result<(), LedgerError> {
        if self.status == InvoiceStatus::Paid {
            return Err(LedgerError::PaidInvoiceLocked(self.invoice_number.clone()));
        }
        Ok(())
    }
}

/// Formats the next invoice number from the current invoice count
///
/// `INV-{YYYYMM}-{NNNN}` where the sequence is count-of-all-existing + 1.
/// The count is over every invoice, not just the month's, so the sequence
/// keeps climbing across month boundaries. Count-then-format is not atomic
/// on its own; the record store wraps it in a transaction and retries on a
/// uniqueness conflict.
pub fn invoice_number(existing_count: u64, date: NaiveDate) -> String {
    format!(
        "INV-{}-{:04}",
        CalendarMonth::containing(date).compact(),
        existing_count + 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period() -> BillingPeriod {
        BillingPeriod::new(date(2024, 6, 1), date(2024, 6, 30), date(2024, 7, 10)).unwrap()
    }

    fn invoice(amount: Decimal, status: InvoiceStatus) -> Invoice {
        let mut inv = Invoice::new(
            CustomerId::new(),
            "INV-202406-0001",
            period(),
            amount,
            None,
            Utc::now(),
        );
        inv.status = status;
        inv
    }

    #[test]
    fn test_new_invoice_is_draft_with_zero_paid() {
        let inv = invoice(dec!(500000), InvoiceStatus::Draft);
        assert_eq!(inv.paid_amount, Decimal::ZERO);
        assert_eq!(inv.remaining_balance(), dec!(500000));
        assert!(!inv.is_fully_paid());
    }

    #[test]
    fn test_overdue_requires_billable_status() {
        let past_due = date(2024, 7, 11);
        for status in [InvoiceStatus::Sent, InvoiceStatus::Overdue] {
            assert!(invoice(dec!(100), status).is_overdue(past_due));
        }
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
        ] {
            assert!(!invoice(dec!(100), status).is_overdue(past_due));
        }
    }

    #[test]
    fn test_not_overdue_before_due_date() {
        let inv = invoice(dec!(100), InvoiceStatus::Sent);
        assert!(!inv.is_overdue(date(2024, 7, 10)));
    }

    #[test]
    fn test_refresh_overdue_from_sent_and_draft() {
        let now = Utc::now();
        let past_due = date(2024, 7, 11);

        let mut sent = invoice(dec!(100), InvoiceStatus::Sent);
        assert!(sent.refresh_overdue_status(past_due, now));
        assert_eq!(sent.status, InvoiceStatus::Overdue);

        let mut draft = invoice(dec!(100), InvoiceStatus::Draft);
        assert!(draft.refresh_overdue_status(past_due, now));
        assert_eq!(draft.status, InvoiceStatus::Overdue);

        let mut paid = invoice(dec!(100), InvoiceStatus::Paid);
        assert!(!paid.refresh_overdue_status(past_due, now));
        assert_eq!(paid.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_mark_sent_only_from_draft() {
        let now = Utc::now();
        let mut inv = invoice(dec!(100), InvoiceStatus::Draft);
        inv.mark_sent(now).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Sent);
        assert_eq!(inv.sent_at, Some(now));

        assert!(inv.mark_sent(now).is_err());
    }

    #[test]
    fn test_record_payment_partial_then_full() {
        let now = Utc::now();
        let mut inv = invoice(dec!(500000), InvoiceStatus::Sent);

        inv.record_payment(dec!(200000), now).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Sent);
        assert_eq!(inv.remaining_balance(), dec!(300000));

        inv.record_payment(dec!(300000), now).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert!(inv.paid_at.is_some());
    }

    #[test]
    fn test_record_payment_rejects_non_positive() {
        let mut inv = invoice(dec!(100), InvoiceStatus::Sent);
        assert!(inv.record_payment(Decimal::ZERO, Utc::now()).is_err());
        assert!(inv.record_payment(dec!(-5), Utc::now()).is_err());
    }

    #[test]
    fn test_overpayment_is_permitted() {
        let mut inv = invoice(dec!(100), InvoiceStatus::Sent);
        inv.record_payment(dec!(150), Utc::now()).unwrap();

        assert_eq!(inv.paid_amount, dec!(150));
        assert!(inv.is_fully_paid());
        assert_eq!(inv.remaining_balance(), dec!(-50));
    }

    #[test]
    fn test_paid_invoice_not_deletable() {
        assert!(invoice(dec!(100), InvoiceStatus::Paid).deletable().is_err());
        assert!(invoice(dec!(100), InvoiceStatus::Sent).deletable().is_ok());
        assert!(invoice(dec!(100), InvoiceStatus::Draft)
            .deletable()
            .is_ok());
    }

    #[test]
    fn test_invoice_number_format() {
        assert_eq!(invoice_number(3, date(2024, 6, 15)), "INV-202406-0004");
        assert_eq!(invoice_number(0, date(2024, 1, 1)), "INV-202401-0001");
    }
}
