//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each domain aggregate. Repositories encapsulate
//! SQL queries and map between database rows and domain types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries with explicit row structs
//! - Transaction support for reference number assignment
//! - Status enums stored as PostgreSQL enum types

pub mod customers;
pub mod invoices;
pub mod payments;

pub use customers::CustomerRepository;
pub use invoices::InvoiceRepository;
pub use payments::PaymentRepository;
