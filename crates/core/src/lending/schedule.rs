//! Installment schedule generation.
//!
//! A loan of `N` months is repaid in `N` monthly installments. Each
//! installment is the principal divided by `N`, rounded half away from zero
//! to whole currency units; the final installment absorbs the rounding
//! remainder so the schedule adds up to the principal. Installment `i`
//! falls due on the policy's due day, at 23:59:59 in the policy's calendar
//! zone, `i + 1` months after the loan is approved.

use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::lending::error::LendingError;
use crate::lending::policy::LendingPolicy;

/// One generated installment, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledInstallment {
    /// 1-based position in the schedule.
    pub sequence: u32,
    /// Amount due.
    pub amount: Decimal,
    /// Due instant.
    pub due_date: DateTime<Utc>,
}

/// Stateless installment scheduler.
pub struct InstallmentScheduler;

impl InstallmentScheduler {
    /// Generates the full repayment schedule for an approved loan.
    ///
    /// The result is ordered by ascending due date.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Validation` if `duration_months` is zero or the
    /// principal is too small to give every installment a positive amount,
    /// and `LendingError::Configuration` if a due date cannot be represented.
    pub fn generate(
        policy: &LendingPolicy,
        principal: Decimal,
        duration_months: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScheduledInstallment>, LendingError> {
        let (amount, last_amount) = Self::amounts(principal, duration_months)?;

        (0..duration_months)
            .map(|i| {
                Ok(ScheduledInstallment {
                    sequence: i + 1,
                    amount: if i + 1 == duration_months {
                        last_amount
                    } else {
                        amount
                    },
                    due_date: Self::due_date(policy, now, i + 1)?,
                })
            })
            .collect()
    }

    /// Checks that `principal` can be split into `duration_months` positive
    /// installments, without computing due dates.
    ///
    /// # Errors
    ///
    /// Same `Validation` failures as [`Self::generate`].
    pub fn ensure_feasible(principal: Decimal, duration_months: u32) -> Result<(), LendingError> {
        Self::amounts(principal, duration_months).map(|_| ())
    }

    /// Regular installment amount: `principal / duration_months`, rounded.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Validation` if `duration_months` is zero.
    pub fn installment_amount(
        principal: Decimal,
        duration_months: u32,
    ) -> Result<Decimal, LendingError> {
        if duration_months == 0 {
            return Err(LendingError::Validation(
                "loan period must be at least one month".to_string(),
            ));
        }
        Ok(Self::round(principal / Decimal::from(duration_months)))
    }

    /// Due instant `months_ahead` calendar months after `now`.
    ///
    /// # Errors
    ///
    /// Returns `LendingError::Configuration` if the date overflows or the
    /// local time does not exist in the policy's zone.
    pub fn due_date(
        policy: &LendingPolicy,
        now: DateTime<Utc>,
        months_ahead: u32,
    ) -> Result<DateTime<Utc>, LendingError> {
        let local_today = now.with_timezone(&policy.timezone).date_naive();

        let due_local = local_today
            .checked_add_months(Months::new(months_ahead))
            .and_then(|date| date.with_day(policy.due_day))
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .ok_or_else(|| {
                LendingError::Configuration(format!(
                    "cannot compute due date {months_ahead} months after {now}"
                ))
            })?;

        policy
            .timezone
            .from_local_datetime(&due_local)
            .earliest()
            .map(|due| due.with_timezone(&Utc))
            .ok_or_else(|| {
                LendingError::Configuration(format!(
                    "due date {due_local} does not exist in {}",
                    policy.timezone
                ))
            })
    }

    /// Regular and final installment amounts.
    fn amounts(
        principal: Decimal,
        duration_months: u32,
    ) -> Result<(Decimal, Decimal), LendingError> {
        if principal <= Decimal::ZERO {
            return Err(LendingError::Validation(
                "loan principal must be positive".to_string(),
            ));
        }

        let amount = Self::installment_amount(principal, duration_months)?;
        let last_amount = Self::round(principal - amount * Decimal::from(duration_months - 1));
        if amount <= Decimal::ZERO || last_amount <= Decimal::ZERO {
            return Err(LendingError::Validation(format!(
                "loan principal {principal} is too small for a {duration_months}-month period"
            )));
        }
        Ok((amount, last_amount))
    }

    fn round(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}
