//! Ledger domain errors

use thiserror::Error;

/// Errors that can occur in the billing ledger
///
/// All of these are user-visible, locally recoverable conditions; none are
/// fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Payment is already confirmed and cannot be confirmed again
    #[error("Payment {0} is already confirmed")]
    AlreadyConfirmed(String),

    /// Confirmed payments cannot be edited or deleted
    #[error("Cannot modify a confirmed payment: {0}")]
    PaymentLocked(String),

    /// Paid invoices cannot be deleted
    #[error("Cannot delete a paid invoice: {0}")]
    PaidInvoiceLocked(String),

    /// Invoice is not in a state the requested transition allows
    #[error("Invalid invoice transition: {0}")]
    InvalidTransition(String),

    /// Amount does not satisfy the entity's sign constraint
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
