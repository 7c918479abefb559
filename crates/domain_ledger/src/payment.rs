//! Payment recording and confirmation
//!
//! Payments arrive in `pending` state and are confirmed (or failed) by a
//! back-office operator. A confirmed payment is immutable from the outside:
//! it cannot be edited, deleted, or re-confirmed. Confirmation deliberately
//! does not touch the linked invoice; settlement is a separate manual step
//! on the invoice itself.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CalendarMonth, CustomerId, InvoiceId, OperatorId, PaymentId};

use crate::error::LedgerError;

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    CreditCard,
    DigitalWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DigitalWallet => "digital_wallet",
        }
    }
}

/// Payment verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded, awaiting operator confirmation
    Pending,
    /// Verified by an operator; terminal for editing
    Confirmed,
    /// Verification failed; may be edited or re-confirmed
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// A payment record, optionally linked to an invoice
///
/// A payment without an invoice reference is a "general payment" against the
/// customer's account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Linked invoice, if any (nulled out if the invoice is deleted)
    pub invoice_id: Option<InvoiceId>,
    /// Human-readable payment reference (PAY-YYYYMM-NNNNNN, unique)
    pub payment_reference: String,
    /// Payment amount (strictly positive)
    pub amount: Decimal,
    /// Payment method used
    pub method: PaymentMethod,
    /// Date the payment was received
    pub payment_date: NaiveDate,
    /// Notes or bank transfer details
    pub notes: Option<String>,
    /// Verification status
    pub status: PaymentStatus,
    /// When the payment was confirmed
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Operator who confirmed the payment
    pub confirmed_by: Option<OperatorId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new pending payment
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_id: CustomerId,
        invoice_id: Option<InvoiceId>,
        payment_reference: impl Into<String>,
        amount: Decimal,
        method: PaymentMethod,
        payment_date: NaiveDate,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            customer_id,
            invoice_id,
            payment_reference: payment_reference.into(),
            amount,
            method,
            payment_date,
            notes,
            status: PaymentStatus::Pending,
            confirmed_at: None,
            confirmed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Confirms the payment, stamping the operator and timestamp
    ///
    /// Allowed from `pending` or `failed`. Re-confirming an already-confirmed
    /// payment is rejected without altering confirmed_at/confirmed_by.
    pub fn confirm(&mut self, operator: OperatorId, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.status == PaymentStatus::Confirmed {
            return Err(LedgerError::AlreadyConfirmed(self.payment_reference.clone()));
        }
        self.status = PaymentStatus::Confirmed;
        self.confirmed_at = Some(now);
        self.confirmed_by = Some(operator);
        self.updated_at = now;
        Ok(())
    }

    /// Marks the payment as failed
    pub fn fail(&mut self, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if self.status == PaymentStatus::Confirmed {
            return Err(LedgerError::PaymentLocked(self.payment_reference.clone()));
        }
        self.status = PaymentStatus::Failed;
        self.updated_at = now;
        Ok(())
    }

    /// Edit/delete guard: confirmed payments are locked
    pub fn editable(&self) -> Result<(), LedgerError> {
        if self.status == PaymentStatus::Confirmed {
            return Err(LedgerError::PaymentLocked(self.payment_reference.clone()));
        }
        Ok(())
    }
}

/// Formats the next payment reference from the current payment count
///
/// `PAY-{YYYYMM}-{NNNNNN}`; same global count-then-format scheme as invoice
/// numbers, made safe by the record store's transactional retry.
pub fn payment_reference(existing_count: u64, date: NaiveDate) -> String {
    format!(
        "PAY-{}-{:06}",
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

    fn payment() -> Payment {
        Payment::new(
            CustomerId::new(),
            None,
            "PAY-202406-000001",
            dec!(500000),
            PaymentMethod::BankTransfer,
            date(2024, 6, 15),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_payment_is_pending() {
        let p = payment();
        assert_eq!(p.status, PaymentStatus::Pending);
        assert!(p.confirmed_at.is_none());
        assert!(p.confirmed_by.is_none());
    }

    #[test]
    fn test_confirm_from_pending() {
        let mut p = payment();
        let operator = OperatorId::new();
        let now = Utc::now();

        p.confirm(operator, now).unwrap();

        assert_eq!(p.status, PaymentStatus::Confirmed);
        assert_eq!(p.confirmed_at, Some(now));
        assert_eq!(p.confirmed_by, Some(operator));
    }

    #[test]
    fn test_confirm_from_failed() {
        let mut p = payment();
        p.fail(Utc::now()).unwrap();

        assert!(p.confirm(OperatorId::new(), Utc::now()).is_ok());
        assert_eq!(p.status, PaymentStatus::Confirmed);
    }

    #[test]
    fn test_reconfirm_rejected_without_mutation() {
        let mut p = payment();
        let first_operator = OperatorId::new();
        let first_time = Utc::now();
        p.confirm(first_operator, first_time).unwrap();

        let err = p.confirm(OperatorId::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyConfirmed(_)));
        assert_eq!(p.confirmed_at, Some(first_time));
        assert_eq!(p.confirmed_by, Some(first_operator));
    }

    #[test]
    fn test_confirmed_payment_is_locked() {
        let mut p = payment();
        p.confirm(OperatorId::new(), Utc::now()).unwrap();

        assert!(p.editable().is_err());
        assert!(p.fail(Utc::now()).is_err());
        assert_eq!(p.status, PaymentStatus::Confirmed);
    }

    #[test]
    fn test_pending_and_failed_are_editable() {
        let mut p = payment();
        assert!(p.editable().is_ok());
        p.fail(Utc::now()).unwrap();
        assert!(p.editable().is_ok());
    }

    #[test]
    fn test_payment_reference_format() {
        assert_eq!(payment_reference(0, date(2024, 6, 15)), "PAY-202406-000001");
        assert_eq!(
            payment_reference(41, date(2023, 12, 31)),
            "PAY-202312-000042"
        );
    }
}
