//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data that
//! maintains domain invariants, plus fake-data helpers for bulk fixtures.

use chrono::{Duration, NaiveDate};
use core_kernel::BillingPeriod;
use domain_ledger::{Customer, CustomerStatus, InvoiceStatus, PaymentMethod, PaymentStatus};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::CustomerBuilder;

/// Strategy for generating positive monetary amounts (two decimal places)
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for generating non-negative monetary amounts
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for generating invoice statuses
pub fn invoice_status_strategy() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Draft),
        Just(InvoiceStatus::Sent),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::Overdue),
        Just(InvoiceStatus::Cancelled),
    ]
}

/// Strategy for generating payment statuses
pub fn payment_status_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Pending),
        Just(PaymentStatus::Confirmed),
        Just(PaymentStatus::Failed),
    ]
}

/// Strategy for generating payment methods
pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::BankTransfer),
        Just(PaymentMethod::CreditCard),
        Just(PaymentMethod::DigitalWallet),
    ]
}

/// Strategy for generating customer statuses
pub fn customer_status_strategy() -> impl Strategy<Value = CustomerStatus> {
    prop_oneof![
        Just(CustomerStatus::Active),
        Just(CustomerStatus::Suspended),
        Just(CustomerStatus::Terminated),
    ]
}

/// Strategy for generating dates within 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(days)
    })
}

/// Strategy for generating valid billing periods (start < end < due)
pub fn billing_period_strategy() -> impl Strategy<Value = BillingPeriod> {
    (date_2024_strategy(), 1i64..90i64, 1i64..60i64).prop_map(|(start, span, grace)| {
        let end = start + Duration::days(span);
        let due = end + Duration::days(grace);
        BillingPeriod::new(start, end, due).expect("generated period must be ordered")
    })
}

/// Creates a customer with randomized name, email, and PPPoE username
pub fn fake_customer() -> Customer {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let username = name.to_lowercase().replace(' ', ".");
    CustomerBuilder::new()
        .with_name(name)
        .with_email(email)
        .with_pppoe_username(username)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_billing_periods_are_ordered(period in billing_period_strategy()) {
            prop_assert!(period.start() < period.end());
            prop_assert!(period.end() < period.due_date());
        }

        #[test]
        fn test_positive_amounts_are_positive(amount in positive_amount_strategy()) {
            prop_assert!(amount > Decimal::ZERO);
        }
    }

    #[test]
    fn test_fake_customer_has_credentials() {
        let customer = fake_customer();
        assert!(!customer.pppoe_username.is_empty());
        assert!(customer.email.contains('@'));
    }
}
