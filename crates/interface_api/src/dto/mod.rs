//! Request/Response data transfer objects

pub mod customer;
pub mod dashboard;
pub mod invoice;
pub mod payment;

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::ValidationError;

/// Common limit/offset paging parameters for list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    const DEFAULT_LIMIT: i64 = 50;
    const MAX_LIMIT: i64 = 200;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Validator for amounts that may be zero (invoice totals)
pub fn non_negative_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount < Decimal::ZERO {
        return Err(ValidationError::new("amount_negative"));
    }
    Ok(())
}

/// Validator for amounts that must be strictly positive (payments)
pub fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_not_positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_list_query_defaults_and_caps() {
        let query = ListQuery {
            limit: None,
            offset: None,
        };
        assert_eq!(query.limit(), 50);
        assert_eq!(query.offset(), 0);

        let oversized = ListQuery {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(oversized.limit(), 200);
        assert_eq!(oversized.offset(), 0);
    }

    #[test]
    fn test_amount_validators() {
        assert!(non_negative_amount(&Decimal::ZERO).is_ok());
        assert!(non_negative_amount(&dec!(-1)).is_err());
        assert!(positive_amount(&dec!(0.01)).is_ok());
        assert!(positive_amount(&Decimal::ZERO).is_err());
    }
}
