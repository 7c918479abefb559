//! Test Data Builders
//!
//! Provides builder patterns for constructing domain entities with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{BillingPeriod, CustomerId, InvoiceId, OperatorId};
use domain_ledger::{
    Customer, CustomerStatus, Invoice, InvoiceStatus, Payment, PaymentMethod, PaymentStatus,
};
use rust_decimal::Decimal;

use crate::fixtures::{AmountFixtures, StringFixtures, TemporalFixtures};

/// Builder for constructing test customers
pub struct CustomerBuilder {
    id: CustomerId,
    name: String,
    email: String,
    pppoe_username: String,
    service_plan: String,
    monthly_fee: Decimal,
    bandwidth_download: i32,
    bandwidth_upload: i32,
    status: CustomerStatus,
    service_start_date: NaiveDate,
}

impl Default for CustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: CustomerId::new(),
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            pppoe_username: StringFixtures::pppoe_username().to_string(),
            service_plan: StringFixtures::service_plan().to_string(),
            monthly_fee: AmountFixtures::monthly_fee(),
            bandwidth_download: 50,
            bandwidth_upload: 25,
            status: CustomerStatus::Active,
            service_start_date: TemporalFixtures::service_start(),
        }
    }

    /// Sets the customer ID
    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = id;
        self
    }

    /// Sets the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the PPPoE username
    pub fn with_pppoe_username(mut self, username: impl Into<String>) -> Self {
        self.pppoe_username = username.into();
        self
    }

    /// Sets the service plan
    pub fn with_service_plan(mut self, plan: impl Into<String>) -> Self {
        self.service_plan = plan.into();
        self
    }

    /// Sets the monthly fee
    pub fn with_monthly_fee(mut self, fee: Decimal) -> Self {
        self.monthly_fee = fee;
        self
    }

    /// Sets the service status
    pub fn with_status(mut self, status: CustomerStatus) -> Self {
        self.status = status;
        self
    }

    /// Shortcut for a suspended customer
    pub fn suspended() -> Self {
        Self::new().with_status(CustomerStatus::Suspended)
    }

    /// Shortcut for a terminated customer
    pub fn terminated() -> Self {
        Self::new().with_status(CustomerStatus::Terminated)
    }

    /// Builds the customer
    pub fn build(self) -> Customer {
        let now = TemporalFixtures::mid_june();
        Customer {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: Some("+62-812-0000-0000".to_string()),
            address: "Jl. Merdeka 1, Jakarta".to_string(),
            pppoe_username: self.pppoe_username,
            pppoe_password: "secret123".to_string(),
            service_plan: self.service_plan,
            monthly_fee: self.monthly_fee,
            bandwidth_download: self.bandwidth_download,
            bandwidth_upload: self.bandwidth_upload,
            status: self.status,
            service_start_date: self.service_start_date,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Builder for constructing test invoices
pub struct InvoiceBuilder {
    customer_id: CustomerId,
    invoice_number: String,
    period: BillingPeriod,
    amount: Decimal,
    paid_amount: Decimal,
    status: InvoiceStatus,
    created_at: DateTime<Utc>,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    /// Creates a new builder with default values (draft, nothing paid)
    pub fn new() -> Self {
        Self {
            customer_id: CustomerId::new(),
            invoice_number: StringFixtures::invoice_number().to_string(),
            period: TemporalFixtures::june_period(),
            amount: AmountFixtures::monthly_fee(),
            paid_amount: Decimal::ZERO,
            status: InvoiceStatus::Draft,
            created_at: TemporalFixtures::mid_june(),
        }
    }

    /// Sets the owning customer
    pub fn for_customer(mut self, id: CustomerId) -> Self {
        self.customer_id = id;
        self
    }

    /// Sets the invoice number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = number.into();
        self
    }

    /// Sets the billing period
    pub fn with_period(mut self, period: BillingPeriod) -> Self {
        self.period = period;
        self
    }

    /// Sets the invoice total
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the paid amount
    pub fn with_paid_amount(mut self, paid: Decimal) -> Self {
        self.paid_amount = paid;
        self
    }

    /// Sets the status
    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    /// Shortcut for a sent, unpaid invoice
    pub fn sent() -> Self {
        Self::new().with_status(InvoiceStatus::Sent)
    }

    /// Shortcut for an overdue invoice
    pub fn overdue() -> Self {
        Self::new().with_status(InvoiceStatus::Overdue)
    }

    /// Builds the invoice
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::new(
            self.customer_id,
            self.invoice_number,
            self.period,
            self.amount,
            None,
            self.created_at,
        );
        invoice.paid_amount = self.paid_amount;
        invoice.status = self.status;
        invoice
    }
}

/// Builder for constructing test payments
pub struct PaymentBuilder {
    customer_id: CustomerId,
    invoice_id: Option<InvoiceId>,
    payment_reference: String,
    amount: Decimal,
    method: PaymentMethod,
    payment_date: NaiveDate,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
}

impl Default for PaymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentBuilder {
    /// Creates a new builder with default values (pending, unlinked)
    pub fn new() -> Self {
        Self {
            customer_id: CustomerId::new(),
            invoice_id: None,
            payment_reference: StringFixtures::payment_reference().to_string(),
            amount: AmountFixtures::monthly_fee(),
            method: PaymentMethod::BankTransfer,
            payment_date: TemporalFixtures::mid_june().date_naive(),
            status: PaymentStatus::Pending,
            created_at: TemporalFixtures::mid_june(),
        }
    }

    /// Sets the owning customer
    pub fn for_customer(mut self, id: CustomerId) -> Self {
        self.customer_id = id;
        self
    }

    /// Links the payment to an invoice
    pub fn for_invoice(mut self, id: InvoiceId) -> Self {
        self.invoice_id = Some(id);
        self
    }

    /// Sets the payment reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.payment_reference = reference.into();
        self
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the payment method
    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the payment date
    pub fn with_payment_date(mut self, date: NaiveDate) -> Self {
        self.payment_date = date;
        self
    }

    /// Shortcut for a payment pre-confirmed by a fixed operator
    pub fn confirmed() -> Self {
        let mut builder = Self::new();
        builder.status = PaymentStatus::Confirmed;
        builder
    }

    /// Builds the payment
    pub fn build(self) -> Payment {
        let mut payment = Payment::new(
            self.customer_id,
            self.invoice_id,
            self.payment_reference,
            self.amount,
            self.method,
            self.payment_date,
            None,
            self.created_at,
        );
        if self.status == PaymentStatus::Confirmed {
            payment
                .confirm(OperatorId::new(), self.created_at)
                .expect("fresh payment must be confirmable");
        }
        payment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_customer_builder_defaults() {
        let customer = CustomerBuilder::new().build();
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.monthly_fee, dec!(500000));
    }

    #[test]
    fn test_invoice_builder_customization() {
        let invoice = InvoiceBuilder::sent()
            .with_amount(dec!(750000))
            .with_paid_amount(dec!(250000))
            .build();

        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.remaining_balance(), dec!(500000));
    }

    #[test]
    fn test_payment_builder_confirmed() {
        let payment = PaymentBuilder::confirmed().build();
        assert_eq!(payment.status, PaymentStatus::Confirmed);
        assert!(payment.confirmed_at.is_some());
        assert!(payment.confirmed_by.is_some());
    }
}
