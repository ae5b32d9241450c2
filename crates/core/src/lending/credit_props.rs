//! Property-based tests for the credit ledger.
//!
//! - Accepted loans never push a `Good` borrower over the credit limit
//! - Refused loans would have pushed the borrower over the tier limit
//! - Delay totals never go negative and tiers follow the thresholds

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::credit::{BorrowDecision, CreditLedger};
use super::policy::LendingPolicy;
use super::types::{BorrowerCredit, CreditHealth};

/// Strategy to generate whole-unit amounts (0 to 10,000,000).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000i64).prop_map(Decimal::from)
}

fn health() -> impl Strategy<Value = CreditHealth> {
    prop_oneof![
        Just(CreditHealth::Good),
        Just(CreditHealth::Warning),
        Just(CreditHealth::Blocked),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* `Good` borrower within their limit, a sequence of accepted
    /// reservations never leaves `credit_used` above `credit_limit`.
    #[test]
    fn prop_good_borrower_never_exceeds_limit(
        limit in amount(),
        requests in prop::collection::vec(amount(), 1..20),
    ) {
        let policy = LendingPolicy::default();
        let mut credit = BorrowerCredit {
            credit_limit: limit,
            credit_used: Decimal::ZERO,
            total_delay: 0,
            credit_health: CreditHealth::Good,
        };

        for principal in requests {
            if CreditLedger::ensure_can_borrow(&policy, &credit, principal).is_ok() {
                CreditLedger::reserve(&mut credit, principal);
            }
            prop_assert!(credit.credit_used <= credit.credit_limit);
        }
    }

    /// *For any* refusal other than `Blocked`, the principal really does not
    /// fit the tier limit, and every allowed principal does.
    #[test]
    fn prop_decision_matches_tier_limit(
        limit in amount(),
        used in amount(),
        principal in amount(),
        tier in health(),
    ) {
        let policy = LendingPolicy::default();
        let credit = BorrowerCredit {
            credit_limit: limit,
            credit_used: used,
            total_delay: 0,
            credit_health: tier,
        };
        let tier_limit = CreditLedger::tier_limit(&policy, &credit);

        match CreditLedger::can_borrow(&policy, &credit, principal) {
            BorrowDecision::Allow => prop_assert!(used + principal <= tier_limit),
            BorrowDecision::ExceedsLimit { .. } => {
                prop_assert_eq!(tier, CreditHealth::Good);
                prop_assert!(used + principal > tier_limit);
            }
            BorrowDecision::ExceedsLimitWarning { .. } => {
                prop_assert_eq!(tier, CreditHealth::Warning);
                prop_assert!(used + principal > tier_limit);
            }
            BorrowDecision::Blocked => prop_assert_eq!(tier, CreditHealth::Blocked),
        }
    }

    /// *For any* delay history, applying a payment keeps the total
    /// non-negative and the tier consistent with the thresholds.
    #[test]
    fn prop_delay_total_stays_consistent(
        delays in prop::collection::vec(0i32..40, 1..30),
    ) {
        let policy = LendingPolicy::default();
        let mut credit = BorrowerCredit {
            credit_limit: Decimal::from(1_000_000),
            credit_used: Decimal::from(1_000_000),
            total_delay: 0,
            credit_health: CreditHealth::Good,
        };

        for delay in delays {
            let before = credit.total_delay;
            CreditLedger::apply_payment(&policy, &mut credit, Decimal::ONE, delay);

            prop_assert!(credit.total_delay >= 0);
            if delay > 0 {
                prop_assert_eq!(credit.total_delay, before + delay);
            } else {
                prop_assert_eq!(credit.total_delay, (before - 10).max(0));
            }
            prop_assert_eq!(
                credit.credit_health,
                CreditLedger::health_for_delay(&policy, credit.total_delay)
            );
        }
    }

    /// Reserve followed by release restores usage exactly.
    #[test]
    fn prop_release_undoes_reserve(used in amount(), principal in amount()) {
        let mut credit = BorrowerCredit {
            credit_limit: Decimal::ZERO,
            credit_used: used,
            total_delay: 0,
            credit_health: CreditHealth::Good,
        };
        CreditLedger::reserve(&mut credit, principal);
        CreditLedger::release(&mut credit, principal);
        prop_assert_eq!(credit.credit_used, used);
    }
}
