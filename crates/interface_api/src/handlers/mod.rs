//! Request handlers

pub mod customers;
pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod payments;
