//! Invoice repository implementation
//!
//! Database access for postpaid invoices. Invoice numbers are assigned in
//! a transaction: count all invoices, format the next number, and insert.
//! The count is global, so the sequence keeps climbing across months rather
//! than restarting at 0001. The unique index on invoice_number is the
//! backstop against a concurrent insert picking the same count, in which
//! case the whole sequence is retried with a fresh count.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{BillingPeriod, CustomerId, InvoiceId};
use domain_ledger::{invoice_number, Invoice, InvoiceStatus};

use crate::error::DatabaseError;

const NUMBERING_ATTEMPTS: u32 = 3;

/// Data for creating a new invoice
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    pub period: BillingPeriod,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Aggregate counters for the invoice list view
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceListStats {
    pub total: i64,
    pub unpaid_count: i64,
    pub overdue_count: i64,
    pub unpaid_amount: Decimal,
}

/// Repository for managing invoices
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a draft invoice with a freshly assigned invoice number
    ///
    /// Retries the count-then-insert sequence on a uniqueness conflict, so
    /// concurrent creations each get a distinct number.
    pub async fn create(
        &self,
        new: NewInvoice,
        now: DateTime<Utc>,
    ) -> Result<Invoice, DatabaseError> {
        let mut last_conflict = None;
        for attempt in 1..=NUMBERING_ATTEMPTS {
            let mut tx = self.pool.begin().await?;

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
                .fetch_one(tx.as_mut())
                .await?;

            let number = invoice_number(count as u64, now.date_naive());
            let invoice = Invoice::new(
                new.customer_id,
                number,
                new.period,
                new.amount,
                new.description.clone(),
                now,
            );

            match insert_invoice(tx.as_mut(), &invoice).await {
                Ok(()) => {
                    tx.commit().await?;
                    return Ok(invoice);
                }
                Err(e) if e.is_unique_violation() => {
                    debug!(attempt, number = %invoice.invoice_number, "invoice number conflict, retrying");
                    tx.rollback().await?;
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_conflict.unwrap_or_else(|| {
            DatabaseError::TransactionFailed("invoice numbering retries exhausted".to_string())
        }))
    }

    /// Writes back all mutable fields of an existing invoice
    pub async fn update(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                customer_id = $2, period_start = $3, period_end = $4, due_date = $5,
                amount = $6, paid_amount = $7, status = $8, description = $9,
                sent_at = $10, paid_at = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(invoice.id))
        .bind(Uuid::from(invoice.customer_id))
        .bind(invoice.period.start())
        .bind(invoice.period.end())
        .bind(invoice.period.due_date())
        .bind(invoice.amount)
        .bind(invoice.paid_amount)
        .bind(InvoiceStatusDb::from(invoice.status))
        .bind(&invoice.description)
        .bind(invoice.sent_at)
        .bind(invoice.paid_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Invoice", invoice.id));
        }
        Ok(())
    }

    /// Retrieves an invoice by ID
    pub async fn find_by_id(&self, id: InvoiceId) -> Result<Invoice, DatabaseError> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, customer_id, invoice_number, period_start, period_end, due_date,
                   amount, paid_amount, status, description, sent_at, paid_at,
                   created_at, updated_at
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Invoice", id))?;

        row.try_into()
    }

    /// Lists invoices, newest first, with limit/offset paging
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Invoice>, DatabaseError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, customer_id, invoice_number, period_start, period_end, due_date,
                   amount, paid_amount, status, description, sent_at, paid_at,
                   created_at, updated_at
            FROM invoices
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    /// Lists all invoices for a customer, newest first
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Invoice>, DatabaseError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, customer_id, invoice_number, period_start, period_end, due_date,
                   amount, paid_amount, status, description, sent_at, paid_at,
                   created_at, updated_at
            FROM invoices
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(Uuid::from(customer_id))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    /// Retrieves every invoice record
    ///
    /// Dashboard aggregation and the overdue refresh work over the full
    /// record set.
    pub async fn find_all(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, customer_id, invoice_number, period_start, period_end, due_date,
                   amount, paid_amount, status, description, sent_at, paid_at,
                   created_at, updated_at
            FROM invoices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    /// Deletes an invoice
    ///
    /// Payments referencing it keep their record but lose the link at the
    /// schema level. The caller is responsible for the paid-invoice guard.
    pub async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Invoice", id));
        }
        Ok(())
    }

    /// Aggregate counters shown above the invoice list
    ///
    /// Overdue is computed fresh from the due date, not the stored status.
    pub async fn list_stats(&self, today: NaiveDate) -> Result<InvoiceListStats, DatabaseError> {
        let stats = sqlx::query_as::<_, InvoiceListStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (
                    WHERE status IN ('sent', 'overdue') AND amount > paid_amount
                ) AS unpaid_count,
                COUNT(*) FILTER (
                    WHERE status IN ('sent', 'overdue') AND due_date < $1
                ) AS overdue_count,
                COALESCE(SUM(amount - paid_amount) FILTER (
                    WHERE status IN ('sent', 'overdue') AND amount > paid_amount
                ), 0) AS unpaid_amount
            FROM invoices
            "#,
        )
        .bind(today)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

async fn insert_invoice(conn: &mut PgConnection, invoice: &Invoice) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, customer_id, invoice_number, period_start, period_end, due_date,
            amount, paid_amount, status, description, sent_at, paid_at,
            created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(Uuid::from(invoice.id))
    .bind(Uuid::from(invoice.customer_id))
    .bind(&invoice.invoice_number)
    .bind(invoice.period.start())
    .bind(invoice.period.end())
    .bind(invoice.period.due_date())
    .bind(invoice.amount)
    .bind(invoice.paid_amount)
    .bind(InvoiceStatusDb::from(invoice.status))
    .bind(&invoice.description)
    .bind(invoice.sent_at)
    .bind(invoice.paid_at)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Invoice status as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
pub enum InvoiceStatusDb {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl From<InvoiceStatus> for InvoiceStatusDb {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => InvoiceStatusDb::Draft,
            InvoiceStatus::Sent => InvoiceStatusDb::Sent,
            InvoiceStatus::Paid => InvoiceStatusDb::Paid,
            InvoiceStatus::Overdue => InvoiceStatusDb::Overdue,
            InvoiceStatus::Cancelled => InvoiceStatusDb::Cancelled,
        }
    }
}

impl From<InvoiceStatusDb> for InvoiceStatus {
    fn from(status: InvoiceStatusDb) -> Self {
        match status {
            InvoiceStatusDb::Draft => InvoiceStatus::Draft,
            InvoiceStatusDb::Sent => InvoiceStatus::Sent,
            InvoiceStatusDb::Paid => InvoiceStatus::Paid,
            InvoiceStatusDb::Overdue => InvoiceStatus::Overdue,
            InvoiceStatusDb::Cancelled => InvoiceStatus::Cancelled,
        }
    }
}

/// Database row for an invoice record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub invoice_number: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub status: InvoiceStatusDb,
    pub description: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DatabaseError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let period = BillingPeriod::new(row.period_start, row.period_end, row.due_date)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        Ok(Invoice {
            id: InvoiceId::from(row.id),
            customer_id: CustomerId::from(row.customer_id),
            invoice_number: row.invoice_number,
            period,
            amount: row.amount,
            paid_amount: row.paid_amount,
            status: row.status.into(),
            description: row.description,
            sent_at: row.sent_at,
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_row() -> InvoiceRow {
        InvoiceRow {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            invoice_number: "INV-202406-0001".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 7, 10).unwrap(),
            amount: dec!(500000),
            paid_amount: dec!(0),
            status: InvoiceStatusDb::Sent,
            description: Some("June service".to_string()),
            sent_at: Some(Utc::now()),
            paid_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_invoice() {
        let row = sample_row();
        let invoice = Invoice::try_from(row.clone()).unwrap();

        assert_eq!(invoice.invoice_number, row.invoice_number);
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.period.due_date(), row.due_date);
        assert_eq!(invoice.remaining_balance(), dec!(500000));
    }

    #[test]
    fn test_row_with_inverted_period_is_rejected() {
        let mut row = sample_row();
        row.period_end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let result = Invoice::try_from(row);
        assert!(matches!(
            result,
            Err(DatabaseError::SerializationError(_))
        ));
    }
}
