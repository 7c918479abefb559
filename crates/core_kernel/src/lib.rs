//! Core Kernel - Foundational types and utilities for the billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed entity identifiers
//! - Billing-period and calendar-month temporal types

pub mod identifiers;
pub mod period;

pub use identifiers::{CustomerId, InvoiceId, OperatorId, PaymentId};
pub use period::{BillingPeriod, CalendarMonth, PeriodError};
