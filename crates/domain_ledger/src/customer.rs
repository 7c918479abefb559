//! PPPoE subscriber records and per-customer balance rules

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::CustomerId;

use crate::invoice::{Invoice, InvoiceStatus};
use crate::payment::{Payment, PaymentStatus};

/// Customer service status
///
/// Transitions are deliberately unconstrained: any status may follow any
/// other, matching the back-office workflow where suspensions and
/// reactivations are manual decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Suspended,
    Terminated,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Suspended => "suspended",
            CustomerStatus::Terminated => "terminated",
        }
    }
}

/// A PPPoE subscriber
///
/// The PPPoE credential fields are stored as opaque strings; no protocol
/// logic lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: CustomerId,
    /// Full name
    pub name: String,
    /// Email address (globally unique)
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Service address
    pub address: String,
    /// PPPoE username (globally unique)
    pub pppoe_username: String,
    /// PPPoE password (opaque credential)
    pub pppoe_password: String,
    /// Service plan label
    pub service_plan: String,
    /// Monthly service fee (non-negative)
    pub monthly_fee: Decimal,
    /// Download bandwidth in Mbps
    pub bandwidth_download: i32,
    /// Upload bandwidth in Mbps
    pub bandwidth_upload: i32,
    /// Service status
    pub status: CustomerStatus,
    /// Service activation date
    pub service_start_date: NaiveDate,
    /// Additional notes
    pub notes: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Current outstanding balance over this customer's invoices
    ///
    /// Sum of `amount` minus sum of `paid_amount` over invoices with status
    /// sent or overdue. Pure aggregation; zero when no such invoices exist.
    pub fn balance(&self, invoices: &[Invoice]) -> Decimal {
        invoices
            .iter()
            .filter(|inv| inv.customer_id == self.id)
            .filter(|inv| matches!(inv.status, InvoiceStatus::Sent | InvoiceStatus::Overdue))
            .map(|inv| inv.amount - inv.paid_amount)
            .sum()
    }

    /// Total of this customer's confirmed payments
    pub fn total_paid(&self, payments: &[Payment]) -> Decimal {
        payments
            .iter()
            .filter(|p| p.customer_id == self.id)
            .filter(|p| p.status == PaymentStatus::Confirmed)
            .map(|p| p.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{BillingPeriod, OperatorId};
    use rust_decimal_macros::dec;

    use crate::payment::PaymentMethod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn customer() -> Customer {
        Customer {
            id: CustomerId::new(),
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            phone: None,
            address: "Jl. Merdeka 1".to_string(),
            pppoe_username: "budi.santoso".to_string(),
            pppoe_password: "secret123".to_string(),
            service_plan: "Home 50".to_string(),
            monthly_fee: dec!(500000),
            bandwidth_download: 50,
            bandwidth_upload: 25,
            status: CustomerStatus::Active,
            service_start_date: date(2024, 1, 1),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn invoice_for(
        customer: &Customer,
        amount: Decimal,
        paid: Decimal,
        status: InvoiceStatus,
    ) -> Invoice {
        let period =
            BillingPeriod::new(date(2024, 6, 1), date(2024, 6, 30), date(2024, 7, 10)).unwrap();
        let mut inv = Invoice::new(customer.id, "INV-202406-0001", period, amount, None, Utc::now());
        inv.paid_amount = paid;
        inv.status = status;
        inv
    }

    #[test]
    fn test_balance_over_billable_invoices_only() {
        let c = customer();
        let invoices = vec![
            invoice_for(&c, dec!(500000), dec!(0), InvoiceStatus::Sent),
            invoice_for(&c, dec!(500000), dec!(200000), InvoiceStatus::Overdue),
            invoice_for(&c, dec!(500000), dec!(0), InvoiceStatus::Draft),
            invoice_for(&c, dec!(500000), dec!(500000), InvoiceStatus::Paid),
        ];

        assert_eq!(c.balance(&invoices), dec!(800000));
    }

    #[test]
    fn test_balance_zero_without_billable_invoices() {
        let c = customer();
        assert_eq!(c.balance(&[]), Decimal::ZERO);

        let invoices = vec![invoice_for(&c, dec!(100), dec!(0), InvoiceStatus::Cancelled)];
        assert_eq!(c.balance(&invoices), Decimal::ZERO);
    }

    #[test]
    fn test_balance_ignores_other_customers() {
        let c = customer();
        let other = customer();
        let invoices = vec![invoice_for(&other, dec!(500000), dec!(0), InvoiceStatus::Sent)];

        assert_eq!(c.balance(&invoices), Decimal::ZERO);
    }

    #[test]
    fn test_total_paid_counts_confirmed_only() {
        let c = customer();
        let mut confirmed = Payment::new(
            c.id,
            None,
            "PAY-202406-000001",
            dec!(500000),
            PaymentMethod::Cash,
            date(2024, 6, 5),
            None,
            Utc::now(),
        );
        confirmed.confirm(OperatorId::new(), Utc::now()).unwrap();

        let pending = Payment::new(
            c.id,
            None,
            "PAY-202406-000002",
            dec!(250000),
            PaymentMethod::Cash,
            date(2024, 6, 6),
            None,
            Utc::now(),
        );

        assert_eq!(c.total_paid(&[confirmed, pending]), dec!(500000));
    }
}
