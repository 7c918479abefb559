//! Billing period and calendar month types
//!
//! Invoices cover a date range and are due after it; revenue reporting is
//! bucketed by calendar month. Both concepts get explicit types here so the
//! ordering rules live in one place instead of being re-checked ad hoc.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to period construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Billing period end {end} must be after start {start}")]
    EndNotAfterStart { start: NaiveDate, end: NaiveDate },

    #[error("Due date {due} must be after billing period end {end}")]
    DueNotAfterEnd { end: NaiveDate, due: NaiveDate },
}

/// The date range an invoice covers, plus its due date
///
/// Ordering is enforced at construction: start < end < due_date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    start: NaiveDate,
    end: NaiveDate,
    due_date: NaiveDate,
}

impl BillingPeriod {
    /// Creates a billing period, validating date ordering
    pub fn new(start: NaiveDate, end: NaiveDate, due_date: NaiveDate) -> Result<Self, PeriodError> {
        if end <= start {
            return Err(PeriodError::EndNotAfterStart { start, end });
        }
        if due_date <= end {
            return Err(PeriodError::DueNotAfterEnd { end, due: due_date });
        }
        Ok(Self {
            start,
            end,
            due_date,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns true if the covered range contains the given date (inclusive)
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the covered range
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// A year-month bucket for revenue aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl CalendarMonth {
    /// The month containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns true if the given date falls in this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month immediately before this one
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The trailing `n` months ending with this one, oldest first
    pub fn trailing(&self, n: usize) -> Vec<CalendarMonth> {
        let mut months = Vec::with_capacity(n);
        let mut current = *self;
        for _ in 0..n {
            months.push(current);
            current = current.previous();
        }
        months.reverse();
        months
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("year-month from a valid date is always constructible")
    }

    /// Short display label, e.g. "Jun 2024"
    pub fn label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }

    /// Compact form used in reference numbers, e.g. "202406"
    pub fn compact(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_billing_period_ordering() {
        let period = BillingPeriod::new(date(2024, 6, 1), date(2024, 6, 30), date(2024, 7, 10));
        assert!(period.is_ok());

        let bad_end = BillingPeriod::new(date(2024, 6, 30), date(2024, 6, 1), date(2024, 7, 10));
        assert!(matches!(
            bad_end,
            Err(PeriodError::EndNotAfterStart { .. })
        ));

        let bad_due = BillingPeriod::new(date(2024, 6, 1), date(2024, 6, 30), date(2024, 6, 30));
        assert!(matches!(bad_due, Err(PeriodError::DueNotAfterEnd { .. })));
    }

    #[test]
    fn test_billing_period_covers() {
        let period =
            BillingPeriod::new(date(2024, 6, 1), date(2024, 6, 30), date(2024, 7, 10)).unwrap();
        assert!(period.covers(date(2024, 6, 15)));
        assert!(!period.covers(date(2024, 7, 1)));
    }

    #[test]
    fn test_calendar_month_previous_wraps_year() {
        let jan = CalendarMonth {
            year: 2024,
            month: 1,
        };
        assert_eq!(
            jan.previous(),
            CalendarMonth {
                year: 2023,
                month: 12
            }
        );
    }

    #[test]
    fn test_trailing_months_oldest_first() {
        let june = CalendarMonth::containing(date(2024, 6, 15));
        let months = june.trailing(12);

        assert_eq!(months.len(), 12);
        assert_eq!(
            months[0],
            CalendarMonth {
                year: 2023,
                month: 7
            }
        );
        assert_eq!(months[11], june);
    }

    #[test]
    fn test_month_label_and_compact() {
        let june = CalendarMonth {
            year: 2024,
            month: 6,
        };
        assert_eq!(june.label(), "Jun 2024");
        assert_eq!(june.compact(), "202406");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_trailing_is_contiguous(
                year in 2000i32..2100i32,
                month in 1u32..=12u32,
                n in 1usize..24usize,
            ) {
                let last = CalendarMonth { year, month };
                let months = last.trailing(n);

                prop_assert_eq!(months.len(), n);
                prop_assert_eq!(months[n - 1], last);
                for pair in months.windows(2) {
                    prop_assert_eq!(pair[1].previous(), pair[0]);
                }
            }

            #[test]
            fn test_month_contains_its_first_day(
                year in 2000i32..2100i32,
                month in 1u32..=12u32,
            ) {
                let m = CalendarMonth { year, month };
                prop_assert!(m.contains(m.first_day()));
                prop_assert!(!m.previous().contains(m.first_day()));
            }
        }
    }
}
