//! Dashboard aggregation
//!
//! Every number here is computed fresh from the full record set at call time,
//! with no caching or incremental maintenance. Overdue counts filter on the
//! due date directly, so they stay correct even for invoices whose stored
//! status has not been refreshed yet.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::CalendarMonth;

use crate::customer::{Customer, CustomerStatus};
use crate::invoice::Invoice;
use crate::payment::{Payment, PaymentStatus};

/// One point in the trailing monthly revenue series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenuePoint {
    /// Display label, e.g. "Jun 2024"
    pub month: String,
    /// Confirmed payment total for that month
    pub revenue: Decimal,
}

/// Customer count per service status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: CustomerStatus,
    pub count: u64,
}

/// Aggregate statistics shown on the main dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_customers: u64,
    pub active_customers: u64,
    pub suspended_customers: u64,
    pub total_invoices: u64,
    /// Invoices past due in a billable status, counted fresh from due_date
    pub overdue_invoices: u64,
    /// Sum of amount minus sum of paid_amount over unpaid invoices
    pub unpaid_amount: Decimal,
    /// Confirmed payment total for the current calendar month
    pub monthly_revenue: Decimal,
    pub pending_payments: u64,
    /// Trailing 12 months of confirmed revenue, oldest first, current month last
    pub monthly_revenue_series: Vec<MonthlyRevenuePoint>,
    /// Customer distribution across service statuses
    pub service_status: Vec<StatusCount>,
}

/// Computes dashboard statistics over the full record set
pub fn aggregate_dashboard_stats(
    customers: &[Customer],
    invoices: &[Invoice],
    payments: &[Payment],
    today: NaiveDate,
) -> DashboardStats {
    let count_status = |status: CustomerStatus| -> u64 {
        customers.iter().filter(|c| c.status == status).count() as u64
    };

    let unpaid: Vec<&Invoice> = invoices.iter().filter(|inv| inv.is_unpaid()).collect();
    let unpaid_amount = unpaid.iter().map(|inv| inv.amount).sum::<Decimal>()
        - unpaid.iter().map(|inv| inv.paid_amount).sum::<Decimal>();

    let confirmed_in = |month: CalendarMonth| -> Decimal {
        payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Confirmed)
            .filter(|p| month.contains(p.payment_date))
            .map(|p| p.amount)
            .sum()
    };

    let current_month = CalendarMonth::containing(today);
    let monthly_revenue_series = current_month
        .trailing(12)
        .into_iter()
        .map(|month| MonthlyRevenuePoint {
            month: month.label(),
            revenue: confirmed_in(month),
        })
        .collect();

    DashboardStats {
        total_customers: customers.len() as u64,
        active_customers: count_status(CustomerStatus::Active),
        suspended_customers: count_status(CustomerStatus::Suspended),
        total_invoices: invoices.len() as u64,
        overdue_invoices: invoices.iter().filter(|inv| inv.is_overdue(today)).count() as u64,
        unpaid_amount,
        monthly_revenue: confirmed_in(current_month),
        pending_payments: payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
            .count() as u64,
        monthly_revenue_series,
        service_status: vec![
            StatusCount {
                status: CustomerStatus::Active,
                count: count_status(CustomerStatus::Active),
            },
            StatusCount {
                status: CustomerStatus::Suspended,
                count: count_status(CustomerStatus::Suspended),
            },
            StatusCount {
                status: CustomerStatus::Terminated,
                count: count_status(CustomerStatus::Terminated),
            },
        ],
    }
}
