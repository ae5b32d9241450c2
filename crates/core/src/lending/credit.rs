//! Credit ledger: limits, reservations, and delay-based health tiers.

use rust_decimal::Decimal;

use crate::lending::error::LendingError;
use crate::lending::policy::LendingPolicy;
use crate::lending::types::{BorrowerCredit, CreditHealth};

/// Outcome of a credit check for a new loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowDecision {
    /// The principal fits.
    Allow,
    /// The principal does not fit the full credit limit.
    ExceedsLimit {
        /// Credit still available.
        available: Decimal,
    },
    /// The principal does not fit the reduced `Warning` tier limit.
    ExceedsLimitWarning {
        /// Credit still available under the reduced limit.
        available: Decimal,
    },
    /// The borrower may not borrow at all.
    Blocked,
}

/// Stateless service for borrower credit accounting.
///
/// Every mutation works on a [`BorrowerCredit`] value; persisting the
/// result is the caller's job.
pub struct CreditLedger;

impl CreditLedger {
    /// Effective principal of a loan: `amount * percentage / 100`.
    #[must_use]
    pub fn effective_principal(amount: Decimal, percentage: Decimal) -> Decimal {
        amount * percentage / Decimal::ONE_HUNDRED
    }

    /// The limit that applies to the borrower's current tier.
    #[must_use]
    pub fn tier_limit(policy: &LendingPolicy, credit: &BorrowerCredit) -> Decimal {
        match credit.credit_health {
            CreditHealth::Good => credit.credit_limit,
            CreditHealth::Warning => {
                credit.credit_limit * policy.warning_limit_percent / Decimal::ONE_HUNDRED
            }
            CreditHealth::Blocked => Decimal::ZERO,
        }
    }

    /// Checks whether `principal` may be borrowed on top of current usage.
    #[must_use]
    pub fn can_borrow(
        policy: &LendingPolicy,
        credit: &BorrowerCredit,
        principal: Decimal,
    ) -> BorrowDecision {
        if credit.credit_health == CreditHealth::Blocked {
            return BorrowDecision::Blocked;
        }

        let limit = Self::tier_limit(policy, credit);
        if limit - (credit.credit_used + principal) >= Decimal::ZERO {
            return BorrowDecision::Allow;
        }

        let available = (limit - credit.credit_used).max(Decimal::ZERO);
        match credit.credit_health {
            CreditHealth::Warning => BorrowDecision::ExceedsLimitWarning { available },
            _ => BorrowDecision::ExceedsLimit { available },
        }
    }

    /// Like [`Self::can_borrow`] but returns the matching error on refusal.
    pub fn ensure_can_borrow(
        policy: &LendingPolicy,
        credit: &BorrowerCredit,
        principal: Decimal,
    ) -> Result<(), LendingError> {
        match Self::can_borrow(policy, credit, principal) {
            BorrowDecision::Allow => Ok(()),
            BorrowDecision::ExceedsLimit { available } => Err(LendingError::ExceedsCreditLimit {
                requested: principal,
                available,
            }),
            BorrowDecision::ExceedsLimitWarning { available } => {
                Err(LendingError::ExceedsCreditLimitWarning {
                    requested: principal,
                    available,
                })
            }
            BorrowDecision::Blocked => Err(LendingError::CreditHealthBlocked),
        }
    }

    /// Reserves `principal` for a new loan.
    pub fn reserve(credit: &mut BorrowerCredit, principal: Decimal) {
        credit.credit_used += principal;
    }

    /// Gives back the principal of a rejected loan.
    pub fn release(credit: &mut BorrowerCredit, principal: Decimal) {
        credit.credit_used -= principal;
    }

    /// Applies an installment payment to the borrower's credit.
    ///
    /// Late payments add their delay days to the running total; an on-time
    /// payment forgives `policy.delay_decay` days, never going below zero.
    /// The health tier is recomputed from the new total.
    pub fn apply_payment(
        policy: &LendingPolicy,
        credit: &mut BorrowerCredit,
        installment_amount: Decimal,
        delay_days: i32,
    ) {
        credit.credit_used -= installment_amount;

        credit.total_delay = if delay_days > 0 {
            credit.total_delay.saturating_add(delay_days)
        } else {
            (credit.total_delay - policy.delay_decay).max(0)
        };

        credit.credit_health = Self::health_for_delay(policy, credit.total_delay);
    }

    /// Health tier for an accumulated delay total.
    #[must_use]
    pub fn health_for_delay(policy: &LendingPolicy, total_delay: i32) -> CreditHealth {
        if total_delay > policy.blocked_threshold {
            CreditHealth::Blocked
        } else if total_delay > policy.warning_threshold {
            CreditHealth::Warning
        } else {
            CreditHealth::Good
        }
    }
}
