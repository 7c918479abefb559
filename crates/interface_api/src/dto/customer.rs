//! Customer DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::CustomerId;
use domain_ledger::{Customer, CustomerStatus};

use super::non_negative_amount;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1, max = 64))]
    pub pppoe_username: String,
    #[validate(length(min = 6))]
    pub pppoe_password: String,
    #[validate(length(min = 1))]
    pub service_plan: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub monthly_fee: Decimal,
    #[validate(range(min = 1, max = 1000))]
    pub bandwidth_download: i32,
    #[validate(range(min = 1, max = 1000))]
    pub bandwidth_upload: i32,
    pub status: Option<CustomerStatus>,
    pub service_start_date: NaiveDate,
    pub notes: Option<String>,
}

impl CreateCustomerRequest {
    /// Builds the domain entity for a newly registered subscriber
    pub fn into_customer(self, now: DateTime<Utc>) -> Customer {
        Customer {
            id: CustomerId::new_v7(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            pppoe_username: self.pppoe_username,
            pppoe_password: self.pppoe_password,
            service_plan: self.service_plan,
            monthly_fee: self.monthly_fee,
            bandwidth_download: self.bandwidth_download,
            bandwidth_upload: self.bandwidth_upload,
            status: self.status.unwrap_or(CustomerStatus::Active),
            service_start_date: self.service_start_date,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1, max = 64))]
    pub pppoe_username: String,
    /// When absent, the stored credential is kept
    #[validate(length(min = 6))]
    pub pppoe_password: Option<String>,
    #[validate(length(min = 1))]
    pub service_plan: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub monthly_fee: Decimal,
    #[validate(range(min = 1, max = 1000))]
    pub bandwidth_download: i32,
    #[validate(range(min = 1, max = 1000))]
    pub bandwidth_upload: i32,
    pub status: CustomerStatus,
    pub service_start_date: NaiveDate,
    pub notes: Option<String>,
}

impl UpdateCustomerRequest {
    /// Applies the update to an existing customer record
    pub fn apply(self, customer: &mut Customer, now: DateTime<Utc>) {
        customer.name = self.name;
        customer.email = self.email;
        customer.phone = self.phone;
        customer.address = self.address;
        customer.pppoe_username = self.pppoe_username;
        if let Some(password) = self.pppoe_password {
            customer.pppoe_password = password;
        }
        customer.service_plan = self.service_plan;
        customer.monthly_fee = self.monthly_fee;
        customer.bandwidth_download = self.bandwidth_download;
        customer.bandwidth_upload = self.bandwidth_upload;
        customer.status = self.status;
        customer.service_start_date = self.service_start_date;
        customer.notes = self.notes;
        customer.updated_at = now;
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: String,
    pub pppoe_username: String,
    pub service_plan: String,
    pub monthly_fee: Decimal,
    pub bandwidth_download: i32,
    pub bandwidth_upload: i32,
    pub status: CustomerStatus,
    pub service_start_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.into(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            pppoe_username: customer.pppoe_username.clone(),
            service_plan: customer.service_plan.clone(),
            monthly_fee: customer.monthly_fee,
            bandwidth_download: customer.bandwidth_download,
            bandwidth_upload: customer.bandwidth_upload,
            status: customer.status,
            service_start_date: customer.service_start_date,
            notes: customer.notes.clone(),
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Detail view with the derived account figures
#[derive(Debug, Serialize)]
pub struct CustomerDetailResponse {
    #[serde(flatten)]
    pub customer: CustomerResponse,
    /// Outstanding balance over sent and overdue invoices
    pub balance: Decimal,
    /// Total of confirmed payments
    pub total_paid: Decimal,
}
