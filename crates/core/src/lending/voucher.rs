//! Discount voucher rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lending::error::LendingError;

/// Maximum discount percentage a voucher may carry.
pub const MAX_DISCOUNT_PERCENT: i32 = 100;

/// The rule-bearing fields of a stored voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherTerms {
    /// Percentage taken off the installment amount.
    pub discount_percent: i32,
    /// Remaining uses.
    pub quota: i32,
    /// First instant the voucher can be used.
    pub active_date: DateTime<Utc>,
    /// Last instant the voucher can be used.
    pub expire_date: DateTime<Utc>,
}

/// Input for creating a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVoucher {
    /// Display name.
    pub name: String,
    /// Percentage taken off the installment amount (1 to 100).
    pub discount_percent: i32,
    /// Number of uses.
    pub quota: i32,
    /// First instant the voucher can be used.
    pub active_date: DateTime<Utc>,
    /// Last instant the voucher can be used.
    pub expire_date: DateTime<Utc>,
}

/// Result of checking a voucher at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherValidity {
    /// Usable now.
    Valid,
    /// The usage window has not opened yet.
    NotYetActive,
    /// The usage window has closed.
    Expired,
    /// No uses left.
    Exhausted,
}

/// What happens to a voucher after one use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherConsumption {
    /// The voucher stays with this many uses left.
    Remaining(i32),
    /// The last use was taken; the voucher must be deleted.
    Retired,
}

/// Stateless voucher engine.
pub struct VoucherEngine;

impl VoucherEngine {
    /// Checks whether a voucher can be used at `now`.
    #[must_use]
    pub fn validate(terms: &VoucherTerms, now: DateTime<Utc>) -> VoucherValidity {
        if terms.quota <= 0 {
            VoucherValidity::Exhausted
        } else if now < terms.active_date {
            VoucherValidity::NotYetActive
        } else if now > terms.expire_date {
            VoucherValidity::Expired
        } else {
            VoucherValidity::Valid
        }
    }

    /// Fails with `VoucherInvalid` unless the voucher is usable at `now`.
    pub fn ensure_valid(terms: &VoucherTerms, now: DateTime<Utc>) -> Result<(), LendingError> {
        match Self::validate(terms, now) {
            VoucherValidity::Valid => Ok(()),
            _ => Err(LendingError::VoucherInvalid),
        }
    }

    /// Discount granted on `base`: `base * discount_percent / 100`.
    #[must_use]
    pub fn discount(terms: &VoucherTerms, base: Decimal) -> Decimal {
        base * Decimal::from(terms.discount_percent) / Decimal::ONE_HUNDRED
    }

    /// Takes one use off the voucher.
    #[must_use]
    pub fn consume(terms: &VoucherTerms) -> VoucherConsumption {
        let remaining = terms.quota - 1;
        if remaining <= 0 {
            VoucherConsumption::Retired
        } else {
            VoucherConsumption::Remaining(remaining)
        }
    }

    /// Returns true once the usage window has closed.
    #[must_use]
    pub fn is_expired(terms: &VoucherTerms, now: DateTime<Utc>) -> bool {
        now > terms.expire_date
    }

    /// Validates a voucher creation request.
    pub fn validate_new(voucher: &NewVoucher) -> Result<(), LendingError> {
        if voucher.name.trim().is_empty() {
            return Err(LendingError::Validation(
                "voucher name is required".to_string(),
            ));
        }

        if !(1..=MAX_DISCOUNT_PERCENT).contains(&voucher.discount_percent) {
            return Err(LendingError::Validation(format!(
                "discount must be between 1 and {MAX_DISCOUNT_PERCENT} percent"
            )));
        }

        if voucher.quota < 1 {
            return Err(LendingError::Validation(
                "voucher quota must be at least 1".to_string(),
            ));
        }

        if voucher.expire_date < voucher.active_date {
            return Err(LendingError::Validation(
                "voucher cannot expire before it becomes active".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn terms(quota: i32) -> VoucherTerms {
        let now = Utc::now();
        VoucherTerms {
            discount_percent: 10,
            quota,
            active_date: now - Duration::days(1),
            expire_date: now + Duration::days(1),
        }
    }

    fn new_voucher() -> NewVoucher {
        let now = Utc::now();
        NewVoucher {
            name: "Ramadan".to_string(),
            discount_percent: 10,
            quota: 5,
            active_date: now,
            expire_date: now + Duration::days(30),
        }
    }

    #[test]
    fn test_validate_window_and_quota() {
        let voucher = terms(1);
        let now = Utc::now();

        assert_eq!(VoucherEngine::validate(&voucher, now), VoucherValidity::Valid);
        assert_eq!(
            VoucherEngine::validate(&voucher, now - Duration::days(2)),
            VoucherValidity::NotYetActive
        );
        assert_eq!(
            VoucherEngine::validate(&voucher, now + Duration::days(2)),
            VoucherValidity::Expired
        );
        assert_eq!(
            VoucherEngine::validate(&terms(0), now),
            VoucherValidity::Exhausted
        );
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let voucher = terms(1);
        assert!(VoucherEngine::ensure_valid(&voucher, voucher.active_date).is_ok());
        assert!(VoucherEngine::ensure_valid(&voucher, voucher.expire_date).is_ok());
        assert!(!VoucherEngine::is_expired(&voucher, voucher.expire_date));
    }

    #[test]
    fn test_ensure_valid_maps_to_voucher_invalid() {
        assert_eq!(
            VoucherEngine::ensure_valid(&terms(0), Utc::now()),
            Err(LendingError::VoucherInvalid)
        );
    }

    #[rstest]
    #[case(10, dec!(100000), dec!(10000))]
    #[case(100, dec!(33333), dec!(33333))]
    #[case(15, dec!(33333), dec!(4999.95))]
    fn test_discount(#[case] percent: i32, #[case] base: Decimal, #[case] expected: Decimal) {
        let voucher = VoucherTerms {
            discount_percent: percent,
            ..terms(1)
        };
        assert_eq!(VoucherEngine::discount(&voucher, base), expected);
    }

    #[test]
    fn test_consume_retires_last_use() {
        assert_eq!(VoucherEngine::consume(&terms(1)), VoucherConsumption::Retired);
        assert_eq!(
            VoucherEngine::consume(&terms(3)),
            VoucherConsumption::Remaining(2)
        );
    }

    #[test]
    fn test_validate_new_accepts_valid_voucher() {
        assert!(VoucherEngine::validate_new(&new_voucher()).is_ok());

        let base = new_voucher();
        let single_instant = NewVoucher {
            expire_date: base.active_date,
            ..base
        };
        assert!(VoucherEngine::validate_new(&single_instant).is_ok());
    }

    #[rstest]
    #[case(NewVoucher { name: "  ".to_string(), ..new_voucher() })]
    #[case(NewVoucher { discount_percent: 0, ..new_voucher() })]
    #[case(NewVoucher { discount_percent: 101, ..new_voucher() })]
    #[case(NewVoucher { quota: 0, ..new_voucher() })]
    #[case(NewVoucher { expire_date: new_voucher().active_date - Duration::seconds(1), ..new_voucher() })]
    fn test_validate_new_rejects(#[case] voucher: NewVoucher) {
        assert!(matches!(
            VoucherEngine::validate_new(&voucher),
            Err(LendingError::Validation(_))
        ));
    }
}
