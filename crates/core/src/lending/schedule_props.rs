//! Property-based tests for the installment scheduler.
//!
//! - A period of `N` months yields exactly `N` installments
//! - The amounts add up to the principal within one currency unit
//! - Due dates are strictly ascending, one calendar month apart, on the due day

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::policy::LendingPolicy;
use super::schedule::InstallmentScheduler;

/// Strategy to generate principals between 1,000 and 100,000,000 with up to 2 decimals.
fn principal() -> impl Strategy<Value = Decimal> {
    (100_000i64..10_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate approval instants across several years.
fn approval_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..(5 * 365 * 24 * 3600)).prop_map(|secs| {
        DateTime::from_timestamp(1_767_225_600, 0).unwrap_or_default() + Duration::seconds(secs)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_schedule_is_complete(
        principal in principal(),
        duration in 1u32..=36,
        now in approval_instant(),
    ) {
        let policy = LendingPolicy::default();

        let schedule = InstallmentScheduler::generate(&policy, principal, duration, now).unwrap();

        prop_assert_eq!(schedule.len(), duration as usize);

        let total: Decimal = schedule.iter().map(|s| s.amount).sum();
        prop_assert!((total - principal).abs() <= Decimal::ONE);
        prop_assert!(schedule.iter().all(|s| s.amount.fract().is_zero() && s.amount > Decimal::ZERO));
    }

    #[test]
    fn prop_due_dates_ascend_monthly(
        principal in principal(),
        duration in 1u32..=36,
        now in approval_instant(),
    ) {
        let policy = LendingPolicy::default();

        let schedule = InstallmentScheduler::generate(&policy, principal, duration, now).unwrap();
        let local: Vec<_> = schedule
            .iter()
            .map(|s| s.due_date.with_timezone(&policy.timezone))
            .collect();

        prop_assert!(schedule[0].due_date > now);
        for due in &local {
            prop_assert_eq!(due.day(), 25);
            prop_assert_eq!((due.hour(), due.minute(), due.second()), (23, 59, 59));
        }
        for pair in local.windows(2) {
            prop_assert!(pair[0] < pair[1]);
            let months = |d: &chrono::DateTime<chrono_tz::Tz>| d.year() * 12 + d.month0() as i32;
            prop_assert_eq!(months(&pair[1]) - months(&pair[0]), 1);
        }
    }
}
