//! Billing ledger integration tests
//!
//! Exercises the invoice lifecycle, payment confirmation, customer balance
//! rules, and dashboard aggregation end to end, without a database.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::OperatorId;
use domain_ledger::{
    aggregate_dashboard_stats, invoice_number, payment_reference, InvoiceStatus, LedgerError,
    PaymentStatus,
};
use test_utils::{CustomerBuilder, InvoiceBuilder, PaymentBuilder, TemporalFixtures};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod invoice_lifecycle {
    use super::*;

    #[test]
    fn test_draft_sent_paid_happy_path() {
        let now = TemporalFixtures::mid_june();
        let mut invoice = InvoiceBuilder::new().with_amount(dec!(500000)).build();

        invoice.mark_sent(now).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Sent);

        invoice.record_payment(dec!(500000), now).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.remaining_balance(), Decimal::ZERO);
        assert_eq!(invoice.paid_at, Some(now));
    }

    #[test]
    fn test_partial_settlement_keeps_invoice_open() {
        let now = TemporalFixtures::mid_june();
        let mut invoice = InvoiceBuilder::sent().with_amount(dec!(500000)).build();

        invoice.record_payment(dec!(200000), now).unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.remaining_balance(), dec!(300000));
        assert!(invoice.is_unpaid());
    }

    #[test]
    fn test_settling_an_overdue_invoice_marks_it_paid() {
        let now = TemporalFixtures::mid_june();
        let mut invoice = InvoiceBuilder::overdue().with_amount(dec!(100)).build();

        invoice.record_payment(dec!(100), now).unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(!invoice.is_overdue(TemporalFixtures::past_due()));
    }

    #[test]
    fn test_refresh_overdue_is_idempotent() {
        let now = TemporalFixtures::mid_june();
        let today = TemporalFixtures::past_due();
        let mut invoice = InvoiceBuilder::sent().build();

        assert!(invoice.refresh_overdue_status(today, now));
        assert!(!invoice.refresh_overdue_status(today, now));
        assert_eq!(invoice.status, InvoiceStatus::Overdue);
    }

    #[test]
    fn test_refresh_before_due_date_is_a_noop() {
        let now = TemporalFixtures::mid_june();
        let mut invoice = InvoiceBuilder::sent().build();

        assert!(!invoice.refresh_overdue_status(TemporalFixtures::due_date(), now));
        assert_eq!(invoice.status, InvoiceStatus::Sent);
    }

    #[test]
    fn test_paid_invoice_cannot_be_deleted() {
        let now = TemporalFixtures::mid_june();
        let mut invoice = InvoiceBuilder::sent().with_amount(dec!(100)).build();
        invoice.record_payment(dec!(100), now).unwrap();

        let err = invoice.deletable().unwrap_err();
        assert!(matches!(err, LedgerError::PaidInvoiceLocked(_)));
    }

    #[test]
    fn test_invoice_number_sequence() {
        assert_eq!(invoice_number(0, date(2024, 6, 1)), "INV-202406-0001");
        assert_eq!(invoice_number(12, date(2024, 6, 1)), "INV-202406-0013");
    }
}

mod payment_confirmation {
    use super::*;

    #[test]
    fn test_confirmation_does_not_settle_the_invoice() {
        let now = TemporalFixtures::mid_june();
        let invoice = InvoiceBuilder::sent().with_amount(dec!(500000)).build();
        let mut payment = PaymentBuilder::new()
            .for_invoice(invoice.id)
            .with_amount(dec!(500000))
            .build();

        payment.confirm(OperatorId::new(), now).unwrap();

        assert_eq!(payment.status, PaymentStatus::Confirmed);
        assert_eq!(invoice.paid_amount, Decimal::ZERO);
        assert_eq!(invoice.status, InvoiceStatus::Sent);
    }

    #[test]
    fn test_failed_payment_can_be_reconfirmed() {
        let now = TemporalFixtures::mid_june();
        let mut payment = PaymentBuilder::new().build();

        payment.fail(now).unwrap();
        assert_eq!(payment.status, PaymentStatus::Failed);

        payment.confirm(OperatorId::new(), now).unwrap();
        assert_eq!(payment.status, PaymentStatus::Confirmed);
    }

    #[test]
    fn test_confirmed_payment_rejects_every_mutation() {
        let now = TemporalFixtures::mid_june();
        let mut payment = PaymentBuilder::confirmed().build();
        let original_by = payment.confirmed_by;
        let original_at = payment.confirmed_at;

        assert!(matches!(
            payment.confirm(OperatorId::new(), now).unwrap_err(),
            LedgerError::AlreadyConfirmed(_)
        ));
        assert!(matches!(
            payment.fail(now).unwrap_err(),
            LedgerError::PaymentLocked(_)
        ));
        assert!(payment.editable().is_err());

        assert_eq!(payment.confirmed_by, original_by);
        assert_eq!(payment.confirmed_at, original_at);
    }

    #[test]
    fn test_general_payment_has_no_invoice() {
        let payment = PaymentBuilder::new().build();
        assert!(payment.invoice_id.is_none());
    }

    #[test]
    fn test_payment_reference_sequence() {
        assert_eq!(payment_reference(0, date(2024, 6, 1)), "PAY-202406-000001");
        assert_eq!(
            payment_reference(999, date(2024, 6, 1)),
            "PAY-202406-001000"
        );
    }
}

mod customer_balance {
    use super::*;

    #[test]
    fn test_balance_counts_sent_and_overdue_only() {
        let customer = CustomerBuilder::new().build();
        let invoices = vec![
            InvoiceBuilder::sent()
                .for_customer(customer.id)
                .with_amount(dec!(500000))
                .build(),
            InvoiceBuilder::overdue()
                .for_customer(customer.id)
                .with_amount(dec!(500000))
                .with_paid_amount(dec!(100000))
                .build(),
            InvoiceBuilder::new()
                .for_customer(customer.id)
                .with_amount(dec!(500000))
                .build(),
        ];

        assert_eq!(customer.balance(&invoices), dec!(900000));
    }

    #[test]
    fn test_total_paid_ignores_pending_and_failed() {
        let customer = CustomerBuilder::new().build();
        let now = TemporalFixtures::mid_june();

        let confirmed = PaymentBuilder::confirmed()
            .for_customer(customer.id)
            .with_amount(dec!(500000))
            .build();
        let pending = PaymentBuilder::new()
            .for_customer(customer.id)
            .with_amount(dec!(250000))
            .build();
        let mut failed = PaymentBuilder::new()
            .for_customer(customer.id)
            .with_amount(dec!(100000))
            .build();
        failed.fail(now).unwrap();

        assert_eq!(
            customer.total_paid(&[confirmed, pending, failed]),
            dec!(500000)
        );
    }

    #[test]
    fn test_new_customer_has_zero_balance() {
        let customer = CustomerBuilder::new().build();
        assert_eq!(customer.balance(&[]), Decimal::ZERO);
        assert_eq!(customer.total_paid(&[]), Decimal::ZERO);
    }
}

mod dashboard {
    use super::*;

    #[test]
    fn test_empty_record_set_yields_zero_stats() {
        let stats = aggregate_dashboard_stats(&[], &[], &[], date(2024, 6, 15));

        assert_eq!(stats.total_customers, 0);
        assert_eq!(stats.total_invoices, 0);
        assert_eq!(stats.overdue_invoices, 0);
        assert_eq!(stats.unpaid_amount, Decimal::ZERO);
        assert_eq!(stats.monthly_revenue, Decimal::ZERO);
        assert_eq!(stats.pending_payments, 0);

        assert_eq!(stats.monthly_revenue_series.len(), 12);
        assert!(stats
            .monthly_revenue_series
            .iter()
            .all(|point| point.revenue == Decimal::ZERO));
    }

    #[test]
    fn test_revenue_series_is_oldest_first_with_current_month_last() {
        let stats = aggregate_dashboard_stats(&[], &[], &[], date(2024, 6, 15));

        assert_eq!(stats.monthly_revenue_series[0].month, "Jul 2023");
        assert_eq!(stats.monthly_revenue_series[11].month, "Jun 2024");
    }

    #[test]
    fn test_monthly_revenue_requires_matching_year() {
        let this_june = PaymentBuilder::confirmed()
            .with_amount(dec!(500000))
            .with_payment_date(date(2024, 6, 5))
            .build();
        let last_june = PaymentBuilder::confirmed()
            .with_amount(dec!(300000))
            .with_payment_date(date(2023, 6, 5))
            .build();

        let stats = aggregate_dashboard_stats(&[], &[], &[this_june, last_june], date(2024, 6, 15));

        assert_eq!(stats.monthly_revenue, dec!(500000));
    }

    #[test]
    fn test_overdue_count_uses_due_date_not_stored_status() {
        // Sent but past due: counted overdue even though no refresh has run.
        let stale = InvoiceBuilder::sent().build();
        let stats = aggregate_dashboard_stats(&[], &[stale], &[], TemporalFixtures::past_due());

        assert_eq!(stats.overdue_invoices, 1);
    }

    #[test]
    fn test_customer_counts_by_status() {
        let customers = vec![
            CustomerBuilder::new().build(),
            CustomerBuilder::new().build(),
            CustomerBuilder::suspended().build(),
            CustomerBuilder::terminated().build(),
        ];

        let stats = aggregate_dashboard_stats(&customers, &[], &[], date(2024, 6, 15));

        assert_eq!(stats.total_customers, 4);
        assert_eq!(stats.active_customers, 2);
        assert_eq!(stats.suspended_customers, 1);

        let total_by_status: u64 = stats.service_status.iter().map(|s| s.count).sum();
        assert_eq!(total_by_status, 4);
    }

    #[test]
    fn test_unpaid_amount_nets_out_partial_payments() {
        let invoices = vec![
            InvoiceBuilder::sent()
                .with_amount(dec!(500000))
                .with_paid_amount(dec!(200000))
                .build(),
            InvoiceBuilder::overdue().with_amount(dec!(300000)).build(),
            // Paid and draft invoices do not contribute.
            InvoiceBuilder::new()
                .with_amount(dec!(100000))
                .with_status(InvoiceStatus::Paid)
                .build(),
        ];

        let stats = aggregate_dashboard_stats(&[], &invoices, &[], date(2024, 6, 15));

        assert_eq!(stats.unpaid_amount, dec!(600000));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use test_utils::{amount_strategy, date_2024_strategy, positive_amount_strategy};

    proptest! {
        #[test]
        fn test_refresh_overdue_twice_equals_once(today in date_2024_strategy()) {
            let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let mut once = InvoiceBuilder::sent().build();
            let mut twice = InvoiceBuilder::sent().build();

            once.refresh_overdue_status(today, now);
            twice.refresh_overdue_status(today, now);
            twice.refresh_overdue_status(today, now);

            prop_assert_eq!(once.status, twice.status);
        }

        #[test]
        fn test_balance_equals_amount_minus_paid(
            amount in positive_amount_strategy(),
            paid in amount_strategy(),
        ) {
            let customer = CustomerBuilder::new().build();
            let invoice = InvoiceBuilder::sent()
                .for_customer(customer.id)
                .with_amount(amount)
                .with_paid_amount(paid)
                .build();

            prop_assert_eq!(customer.balance(&[invoice]), amount - paid);
        }

        #[test]
        fn test_settlement_never_loses_money(
            amount in positive_amount_strategy(),
            settle in positive_amount_strategy(),
        ) {
            let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let mut invoice = InvoiceBuilder::sent().with_amount(amount).build();

            invoice.record_payment(settle, now).unwrap();

            prop_assert_eq!(invoice.paid_amount, settle);
            prop_assert_eq!(invoice.is_fully_paid(), settle >= amount);
        }
    }
}
