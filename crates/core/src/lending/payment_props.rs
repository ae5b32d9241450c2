//! Property-based tests for payment computation.
//!
//! - The final amount is always `installment - discount + fine`
//! - The discount never exceeds the installment amount
//! - The fine is the per-day fee times the rounded-up late days

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::payment::{InstallmentSnapshot, PaymentProcessor};
use super::policy::LendingPolicy;
use super::types::InstallmentStatus;
use super::voucher::VoucherTerms;

fn installment(amount: Decimal, due_date: DateTime<Utc>) -> InstallmentSnapshot {
    InstallmentSnapshot {
        installment_id: Uuid::new_v4(),
        loan_id: Uuid::new_v4(),
        amount,
        due_date,
        status: InstallmentStatus::Unpaid,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_payment_arithmetic(
        amount in (1i64..100_000_000i64).prop_map(Decimal::from),
        percent in proptest::option::of(1i32..=100),
        offset_secs in -(90i64 * 86_400)..(90i64 * 86_400),
    ) {
        let policy = LendingPolicy::default();
        let now = Utc::now();
        let inst = installment(amount, now - Duration::seconds(offset_secs));
        let voucher = percent.map(|discount_percent| VoucherTerms {
            discount_percent,
            quota: 1,
            active_date: now - Duration::days(1),
            expire_date: now + Duration::days(1),
        });

        let breakdown = PaymentProcessor::compute(&policy, &inst, voucher.as_ref(), now).unwrap();

        prop_assert_eq!(
            breakdown.amount,
            breakdown.installment_amount - breakdown.discount + breakdown.fine
        );
        prop_assert!(breakdown.discount >= Decimal::ZERO);
        prop_assert!(breakdown.discount <= amount);
        prop_assert!(breakdown.amount >= Decimal::ZERO);
        prop_assert_eq!(
            breakdown.fine,
            policy.late_fee_per_day * Decimal::from(breakdown.delay_days)
        );
    }

    #[test]
    fn prop_delay_days_round_up(offset_secs in 1i64..(400i64 * 86_400)) {
        let due = Utc::now();
        let days = PaymentProcessor::delay_days(due, due + Duration::seconds(offset_secs));

        let expected = (offset_secs + 86_399) / 86_400;
        prop_assert_eq!(i64::from(days), expected);
    }

    #[test]
    fn prop_early_payment_has_no_fine(offset_secs in 0i64..(400i64 * 86_400)) {
        let due = Utc::now();
        prop_assert_eq!(
            PaymentProcessor::delay_days(due, due - Duration::seconds(offset_secs)),
            0
        );
    }
}
