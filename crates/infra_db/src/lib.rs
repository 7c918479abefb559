//! Infrastructure Database Layer
//!
//! This crate provides the database infrastructure for the billing back
//! office, implementing the record store on PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access
//! abstractions that hide the database implementation details from the
//! domain layer. Queries are runtime-checked; rows are mapped to domain
//! types at the repository boundary.
//!
//! Reference numbers (invoice numbers, payment references) are assigned
//! with a count-then-format scheme inside a transaction. A concurrent
//! insert can still collide on the unique index, in which case the
//! repository retries with a freshly recomputed count.

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use repositories::{CustomerRepository, InvoiceRepository, PaymentRepository};

/// Applies all pending schema migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
