//! Tunable lending rules.

use chrono_tz::Tz;
use rust_decimal::Decimal;

use tenor_shared::{CompletionRule, LendingConfig};

use crate::lending::error::LendingError;

/// Latest day of month accepted as a due day; every month has it.
pub const MAX_DUE_DAY: u32 = 28;

/// Business rules shared by every lending service.
///
/// Built once from [`LendingConfig`] at startup and passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct LendingPolicy {
    /// Calendar zone used to anchor due dates.
    pub timezone: Tz,
    /// Day of month every installment falls due.
    pub due_day: u32,
    /// Flat fee charged per late day.
    pub late_fee_per_day: Decimal,
    /// Share of the credit limit a `Warning` borrower may use, in percent.
    pub warning_limit_percent: Decimal,
    /// When a loan counts as paid off.
    pub completion_rule: CompletionRule,
    /// Delay days forgiven by an on-time payment.
    pub delay_decay: i32,
    /// Total delay above which a borrower drops to `Warning`.
    pub warning_threshold: i32,
    /// Total delay above which a borrower is `Blocked`.
    pub blocked_threshold: i32,
}

impl LendingPolicy {
    /// Builds a policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Configuration` for an unknown time zone, a due
    /// day outside `1..=28`, a negative late fee, or a warning percentage
    /// outside `0..=100`.
    pub fn from_config(config: &LendingConfig) -> Result<Self, LendingError> {
        let timezone: Tz = config.timezone.parse().map_err(|e| {
            LendingError::Configuration(format!("unknown timezone {}: {e}", config.timezone))
        })?;

        if !(1..=MAX_DUE_DAY).contains(&config.due_day) {
            return Err(LendingError::Configuration(format!(
                "due day must be between 1 and {MAX_DUE_DAY}, got {}",
                config.due_day
            )));
        }

        if config.late_fee_per_day.is_sign_negative() {
            return Err(LendingError::Configuration(
                "late fee per day cannot be negative".to_string(),
            ));
        }

        if config.warning_limit_percent.is_sign_negative()
            || config.warning_limit_percent > Decimal::ONE_HUNDRED
        {
            return Err(LendingError::Configuration(format!(
                "warning limit percent must be between 0 and 100, got {}",
                config.warning_limit_percent
            )));
        }

        Ok(Self {
            timezone,
            due_day: config.due_day,
            late_fee_per_day: config.late_fee_per_day,
            warning_limit_percent: config.warning_limit_percent,
            completion_rule: config.completion_rule,
            ..Self::default()
        })
    }
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Jakarta,
            due_day: 25,
            late_fee_per_day: Decimal::from(5000),
            warning_limit_percent: Decimal::from(80),
            completion_rule: CompletionRule::AllPaid,
            delay_decay: 10,
            warning_threshold: 10,
            blocked_threshold: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_matches_default_config() {
        let policy = LendingPolicy::from_config(&LendingConfig::default()).unwrap();
        assert_eq!(policy, LendingPolicy::default());
    }

    #[test]
    fn test_from_config_overrides() {
        let config = LendingConfig {
            timezone: "UTC".to_string(),
            due_day: 1,
            late_fee_per_day: dec!(0),
            warning_limit_percent: dec!(50),
            completion_rule: CompletionRule::OneBeforeLast,
        };

        let policy = LendingPolicy::from_config(&config).unwrap();

        assert_eq!(policy.timezone, chrono_tz::UTC);
        assert_eq!(policy.due_day, 1);
        assert_eq!(policy.late_fee_per_day, dec!(0));
        assert_eq!(policy.warning_limit_percent, dec!(50));
        assert_eq!(policy.completion_rule, CompletionRule::OneBeforeLast);
        assert_eq!(policy.delay_decay, 10);
    }

    #[rstest]
    #[case("Mars/Olympus", 25, dec!(5000), dec!(80))]
    #[case("Asia/Jakarta", 0, dec!(5000), dec!(80))]
    #[case("Asia/Jakarta", 29, dec!(5000), dec!(80))]
    #[case("Asia/Jakarta", 25, dec!(-1), dec!(80))]
    #[case("Asia/Jakarta", 25, dec!(5000), dec!(101))]
    fn test_from_config_rejects(
        #[case] timezone: &str,
        #[case] due_day: u32,
        #[case] late_fee_per_day: Decimal,
        #[case] warning_limit_percent: Decimal,
    ) {
        let config = LendingConfig {
            timezone: timezone.to_string(),
            due_day,
            late_fee_per_day,
            warning_limit_percent,
            completion_rule: CompletionRule::AllPaid,
        };

        assert!(matches!(
            LendingPolicy::from_config(&config),
            Err(LendingError::Configuration(_))
        ));
    }
}
