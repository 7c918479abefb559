//! Payment repository implementation
//!
//! Database access for payment records. Payment references follow the same
//! count-then-format-then-insert scheme as invoice numbers: a global row
//! count feeds the sequence, and a uniqueness conflict retries with a
//! fresh count.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{CustomerId, InvoiceId, OperatorId, PaymentId};
use domain_ledger::{payment_reference, Payment, PaymentMethod, PaymentStatus};

use crate::error::DatabaseError;

const NUMBERING_ATTEMPTS: u32 = 3;

/// Data for creating a new payment
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: CustomerId,
    pub invoice_id: Option<InvoiceId>,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
}

/// Aggregate counters for the payment list view
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentListStats {
    pub total: i64,
    pub pending_count: i64,
    pub confirmed_count: i64,
    pub confirmed_amount: Decimal,
}

/// Repository for managing payments
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pending payment with a freshly assigned payment reference
    ///
    /// Retries the count-then-insert sequence on a uniqueness conflict, so
    /// concurrent recordings each get a distinct reference.
    pub async fn create(
        &self,
        new: NewPayment,
        now: DateTime<Utc>,
    ) -> Result<Payment, DatabaseError> {
        let mut last_conflict = None;
        for attempt in 1..=NUMBERING_ATTEMPTS {
            let mut tx = self.pool.begin().await?;

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
                .fetch_one(tx.as_mut())
                .await?;

            let payment = Payment::new(
                new.customer_id,
                new.invoice_id,
                payment_reference(count as u64, now.date_naive()),
                new.amount,
                new.method,
                new.payment_date,
                new.notes.clone(),
                now,
            );

            match insert_payment(tx.as_mut(), &payment).await {
                Ok(()) => {
                    tx.commit().await?;
                    return Ok(payment);
                }
                Err(e) if e.is_unique_violation() => {
                    debug!(attempt, reference = %payment.payment_reference, "payment reference conflict, retrying");
                    tx.rollback().await?;
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_conflict.unwrap_or_else(|| {
            DatabaseError::TransactionFailed("payment numbering retries exhausted".to_string())
        }))
    }

    /// Writes back all mutable fields of an existing payment
    ///
    /// The caller is responsible for the confirmed-payment guard.
    pub async fn update(&self, payment: &Payment) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                customer_id = $2, invoice_id = $3, amount = $4, method = $5,
                payment_date = $6, notes = $7, status = $8,
                confirmed_at = $9, confirmed_by = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(payment.id))
        .bind(Uuid::from(payment.customer_id))
        .bind(payment.invoice_id.map(Uuid::from))
        .bind(payment.amount)
        .bind(PaymentMethodDb::from(payment.method))
        .bind(payment.payment_date)
        .bind(&payment.notes)
        .bind(PaymentStatusDb::from(payment.status))
        .bind(payment.confirmed_at)
        .bind(payment.confirmed_by.map(Uuid::from))
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Payment", payment.id));
        }
        Ok(())
    }

    /// Retrieves a payment by ID
    pub async fn find_by_id(&self, id: PaymentId) -> Result<Payment, DatabaseError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_id, invoice_id, payment_reference, amount, method,
                   payment_date, notes, status, confirmed_at, confirmed_by,
                   created_at, updated_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Payment", id))?;

        Ok(row.into())
    }

    /// Lists payments, newest first, with limit/offset paging
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Payment>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_id, invoice_id, payment_reference, amount, method,
                   payment_date, notes, status, confirmed_at, confirmed_by,
                   created_at, updated_at
            FROM payments
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    /// Lists all payments for a customer, newest first
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Payment>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_id, invoice_id, payment_reference, amount, method,
                   payment_date, notes, status, confirmed_at, confirmed_by,
                   created_at, updated_at
            FROM payments
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(Uuid::from(customer_id))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    /// Retrieves every payment record
    pub async fn find_all(&self) -> Result<Vec<Payment>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, customer_id, invoice_id, payment_reference, amount, method,
                   payment_date, notes, status, confirmed_at, confirmed_by,
                   created_at, updated_at
            FROM payments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    /// Deletes a payment
    ///
    /// The caller is responsible for the confirmed-payment guard.
    pub async fn delete(&self, id: PaymentId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Payment", id));
        }
        Ok(())
    }

    /// Aggregate counters shown above the payment list
    pub async fn list_stats(&self) -> Result<PaymentListStats, DatabaseError> {
        let stats = sqlx::query_as::<_, PaymentListStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
                COUNT(*) FILTER (WHERE status = 'confirmed') AS confirmed_count,
                COALESCE(SUM(amount) FILTER (WHERE status = 'confirmed'), 0)
                    AS confirmed_amount
            FROM payments
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

async fn insert_payment(conn: &mut PgConnection, payment: &Payment) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, customer_id, invoice_id, payment_reference, amount, method,
            payment_date, notes, status, confirmed_at, confirmed_by,
            created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(Uuid::from(payment.id))
    .bind(Uuid::from(payment.customer_id))
    .bind(payment.invoice_id.map(Uuid::from))
    .bind(&payment.payment_reference)
    .bind(payment.amount)
    .bind(PaymentMethodDb::from(payment.method))
    .bind(payment.payment_date)
    .bind(&payment.notes)
    .bind(PaymentStatusDb::from(payment.status))
    .bind(payment.confirmed_at)
    .bind(payment.confirmed_by.map(Uuid::from))
    .bind(payment.created_at)
    .bind(payment.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Payment method as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethodDb {
    Cash,
    BankTransfer,
    CreditCard,
    DigitalWallet,
}

impl From<PaymentMethod> for PaymentMethodDb {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => PaymentMethodDb::Cash,
            PaymentMethod::BankTransfer => PaymentMethodDb::BankTransfer,
            PaymentMethod::CreditCard => PaymentMethodDb::CreditCard,
            PaymentMethod::DigitalWallet => PaymentMethodDb::DigitalWallet,
        }
    }
}

impl From<PaymentMethodDb> for PaymentMethod {
    fn from(method: PaymentMethodDb) -> Self {
        match method {
            PaymentMethodDb::Cash => PaymentMethod::Cash,
            PaymentMethodDb::BankTransfer => PaymentMethod::BankTransfer,
            PaymentMethodDb::CreditCard => PaymentMethod::CreditCard,
            PaymentMethodDb::DigitalWallet => PaymentMethod::DigitalWallet,
        }
    }
}

/// Payment status as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatusDb {
    Pending,
    Confirmed,
    Failed,
}

impl From<PaymentStatus> for PaymentStatusDb {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => PaymentStatusDb::Pending,
            PaymentStatus::Confirmed => PaymentStatusDb::Confirmed,
            PaymentStatus::Failed => PaymentStatusDb::Failed,
        }
    }
}

impl From<PaymentStatusDb> for PaymentStatus {
    fn from(status: PaymentStatusDb) -> Self {
        match status {
            PaymentStatusDb::Pending => PaymentStatus::Pending,
            PaymentStatusDb::Confirmed => PaymentStatus::Confirmed,
            PaymentStatusDb::Failed => PaymentStatus::Failed,
        }
    }
}

/// Database row for a payment record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub payment_reference: String,
    pub amount: Decimal,
    pub method: PaymentMethodDb,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
    pub status: PaymentStatusDb,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            id: PaymentId::from(row.id),
            customer_id: CustomerId::from(row.customer_id),
            invoice_id: row.invoice_id.map(InvoiceId::from),
            payment_reference: row.payment_reference,
            amount: row.amount,
            method: row.method.into(),
            payment_date: row.payment_date,
            notes: row.notes,
            status: row.status.into(),
            confirmed_at: row.confirmed_at,
            confirmed_by: row.confirmed_by.map(OperatorId::from),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
