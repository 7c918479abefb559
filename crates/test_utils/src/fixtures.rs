//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the billing
//! system. These fixtures are designed to be consistent and predictable for
//! unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{BillingPeriod, CustomerId, InvoiceId, OperatorId, PaymentId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard billing period start (Jun 1, 2024)
    pub fn period_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Standard billing period end (Jun 30, 2024)
    pub fn period_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    /// Standard due date (Jul 10, 2024)
    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 10).unwrap()
    }

    /// A day before the standard due date
    pub fn before_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 9).unwrap()
    }

    /// A day past the standard due date
    pub fn past_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 11).unwrap()
    }

    /// Standard billing period for June 2024
    pub fn june_period() -> BillingPeriod {
        BillingPeriod::new(Self::period_start(), Self::period_end(), Self::due_date()).unwrap()
    }

    /// A fixed reference timestamp (Jun 15, 2024 12:00 UTC)
    pub fn mid_june() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    /// Standard service activation date (Jan 1, 2024)
    pub fn service_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }
}

/// Fixture for monetary test data
pub struct AmountFixtures;

impl AmountFixtures {
    /// A typical monthly fee
    pub fn monthly_fee() -> Decimal {
        dec!(500000)
    }

    /// A partial settlement against the standard fee
    pub fn partial_payment() -> Decimal {
        dec!(200000)
    }

    /// Zero
    pub fn zero() -> Decimal {
        Decimal::ZERO
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic customer ID for testing
    pub fn customer_id() -> CustomerId {
        CustomerId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic invoice ID for testing
    pub fn invoice_id() -> InvoiceId {
        InvoiceId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic payment ID for testing
    pub fn payment_id() -> PaymentId {
        PaymentId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic operator ID for testing
    pub fn operator_id() -> OperatorId {
        OperatorId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// A well-formed invoice number
    pub fn invoice_number() -> &'static str {
        "INV-202406-0001"
    }

    /// A well-formed payment reference
    pub fn payment_reference() -> &'static str {
        "PAY-202406-000001"
    }

    /// A PPPoE username
    pub fn pppoe_username() -> &'static str {
        "budi.santoso"
    }

    /// A service plan label
    pub fn service_plan() -> &'static str {
        "Home 50"
    }
}
