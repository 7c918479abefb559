//! Customer repository implementation
//!
//! Database access for PPPoE subscriber records. Deleting a customer
//! cascades to their invoices and payments at the schema level.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::CustomerId;
use domain_ledger::{Customer, CustomerStatus};

use crate::error::DatabaseError;

/// Repository for managing customer records
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new customer record
    ///
    /// Returns `DuplicateEntry` if the email or PPPoE username is already
    /// taken.
    pub async fn insert(&self, customer: &Customer) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, email, phone, address, pppoe_username, pppoe_password,
                service_plan, monthly_fee, bandwidth_download, bandwidth_upload,
                status, service_start_date, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(Uuid::from(customer.id))
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.pppoe_username)
        .bind(&customer.pppoe_password)
        .bind(&customer.service_plan)
        .bind(customer.monthly_fee)
        .bind(customer.bandwidth_download)
        .bind(customer.bandwidth_upload)
        .bind(CustomerStatusDb::from(customer.status))
        .bind(customer.service_start_date)
        .bind(&customer.notes)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes back all mutable fields of an existing customer
    pub async fn update(&self, customer: &Customer) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = $2, email = $3, phone = $4, address = $5,
                pppoe_username = $6, pppoe_password = $7, service_plan = $8,
                monthly_fee = $9, bandwidth_download = $10, bandwidth_upload = $11,
                status = $12, service_start_date = $13, notes = $14, updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(customer.id))
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.pppoe_username)
        .bind(&customer.pppoe_password)
        .bind(&customer.service_plan)
        .bind(customer.monthly_fee)
        .bind(customer.bandwidth_download)
        .bind(customer.bandwidth_upload)
        .bind(CustomerStatusDb::from(customer.status))
        .bind(customer.service_start_date)
        .bind(&customer.notes)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", customer.id));
        }
        Ok(())
    }

    /// Retrieves a customer by ID
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Customer, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, email, phone, address, pppoe_username, pppoe_password,
                   service_plan, monthly_fee, bandwidth_download, bandwidth_upload,
                   status, service_start_date, notes, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Customer", id))?;

        Ok(row.into())
    }

    /// Lists customers, newest first, with limit/offset paging
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Customer>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, email, phone, address, pppoe_username, pppoe_password,
                   service_plan, monthly_fee, bandwidth_download, bandwidth_upload,
                   status, service_start_date, notes, created_at, updated_at
            FROM customers
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Retrieves every customer record
    ///
    /// Dashboard aggregation works over the full record set.
    pub async fn find_all(&self) -> Result<Vec<Customer>, DatabaseError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, email, phone, address, pppoe_username, pppoe_password,
                   service_plan, monthly_fee, bandwidth_download, bandwidth_upload,
                   status, service_start_date, notes, created_at, updated_at
            FROM customers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Deletes a customer; invoices and payments cascade at the schema level
    pub async fn delete(&self, id: CustomerId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", id));
        }
        Ok(())
    }

    /// Total number of customer records
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Customer service status as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "customer_status", rename_all = "snake_case")]
pub enum CustomerStatusDb {
    Active,
    Suspended,
    Terminated,
}

impl From<CustomerStatus> for CustomerStatusDb {
    fn from(status: CustomerStatus) -> Self {
        match status {
            CustomerStatus::Active => CustomerStatusDb::Active,
            CustomerStatus::Suspended => CustomerStatusDb::Suspended,
            CustomerStatus::Terminated => CustomerStatusDb::Terminated,
        }
    }
}

impl From<CustomerStatusDb> for CustomerStatus {
    fn from(status: CustomerStatusDb) -> Self {
        match status {
            CustomerStatusDb::Active => CustomerStatus::Active,
            CustomerStatusDb::Suspended => CustomerStatus::Suspended,
            CustomerStatusDb::Terminated => CustomerStatus::Terminated,
        }
    }
}

/// Database row for a customer record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub pppoe_username: String,
    pub pppoe_password: String,
    pub service_plan: String,
    pub monthly_fee: Decimal,
    pub bandwidth_download: i32,
    pub bandwidth_upload: i32,
    pub status: CustomerStatusDb,
    pub service_start_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: CustomerId::from(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            pppoe_username: row.pppoe_username,
            pppoe_password: row.pppoe_password,
            service_plan: row.service_plan,
            monthly_fee: row.monthly_fee,
            bandwidth_download: row.bandwidth_download,
            bandwidth_upload: row.bandwidth_upload,
            status: row.status.into(),
            service_start_date: row.service_start_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
