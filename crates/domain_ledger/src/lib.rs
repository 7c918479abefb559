//! Billing Ledger Domain
//!
//! This crate owns the billing rules of the ISP back office: how invoice
//! amounts, paid amounts, and payment confirmation states relate to each
//! other, and how the aggregate numbers shown on dashboards are derived.
//!
//! # Design
//!
//! Every time-dependent rule takes an explicit `today`/`now` parameter so
//! behavior is deterministic and testable; nothing in this crate reads the
//! ambient clock. Persistence is the caller's job: operations mutate the
//! in-memory entity and report whether anything changed.
//!
//! Two deliberate rules of the back-office workflow:
//!
//! - Confirming a payment does NOT settle the linked invoice. Applying a
//!   confirmed amount to an invoice's `paid_amount` is a separate, explicit
//!   step ([`Invoice::record_payment`]).
//! - `paid_amount` is allowed to exceed `amount`; overpayment is not
//!   rejected anywhere in the ledger.

pub mod customer;
pub mod error;
pub mod invoice;
pub mod payment;
pub mod stats;

pub use customer::{Customer, CustomerStatus};
pub use error::LedgerError;
pub use invoice::{invoice_number, Invoice, InvoiceStatus};
pub use payment::{payment_reference, Payment, PaymentMethod, PaymentStatus};
pub use stats::{aggregate_dashboard_stats, DashboardStats, MonthlyRevenuePoint, StatusCount};
