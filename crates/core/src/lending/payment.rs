//! Installment payment computation.
//!
//! A payment is `installment amount - voucher discount + late fee`. The
//! late fee is a flat amount per late day, where any started day counts
//! as a full one.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::lending::error::LendingError;
use crate::lending::policy::LendingPolicy;
use crate::lending::types::{InstallmentStatus, LoanStatus};
use crate::lending::voucher::{VoucherEngine, VoucherTerms};

/// Loan fields needed to authorize a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanSnapshot {
    /// Loan ID.
    pub loan_id: Uuid,
    /// Owner of the loan.
    pub borrower_id: Uuid,
    /// Current status.
    pub status: LoanStatus,
}

/// Installment fields needed to authorize and price a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentSnapshot {
    /// Installment ID.
    pub installment_id: Uuid,
    /// Loan the installment belongs to.
    pub loan_id: Uuid,
    /// Amount due.
    pub amount: Decimal,
    /// Due instant.
    pub due_date: DateTime<Utc>,
    /// Current status.
    pub status: InstallmentStatus,
}

/// The computed figures of one installment payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentBreakdown {
    /// Installment amount before adjustments.
    pub installment_amount: Decimal,
    /// Voucher discount.
    pub discount: Decimal,
    /// Whole late days.
    pub delay_days: i32,
    /// Late fee.
    pub fine: Decimal,
    /// Final charge.
    pub amount: Decimal,
}

/// Stateless payment processor.
pub struct PaymentProcessor;

impl PaymentProcessor {
    /// Checks that `borrower_id` may pay `installment` of `loan`.
    ///
    /// # Errors
    ///
    /// - `LoanInstallmentMismatch` if the loan is not the borrower's or the
    ///   installment is not the loan's
    /// - `LoanNotPayable` if the loan is pending or rejected
    /// - `InstallmentAlreadyPaid` if the installment is settled
    pub fn authorize(
        borrower_id: Uuid,
        loan: &LoanSnapshot,
        installment: &InstallmentSnapshot,
    ) -> Result<(), LendingError> {
        if loan.borrower_id != borrower_id || installment.loan_id != loan.loan_id {
            return Err(LendingError::LoanInstallmentMismatch);
        }

        if !loan.status.accepts_payments() {
            return Err(LendingError::LoanNotPayable(loan.status));
        }

        if installment.status == InstallmentStatus::Paid {
            return Err(LendingError::InstallmentAlreadyPaid);
        }

        Ok(())
    }

    /// Whole days between `due_date` and `now`, rounded up; zero if not late.
    #[must_use]
    pub fn delay_days(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
        if now <= due_date {
            return 0;
        }

        let elapsed = now - due_date;
        let mut days = elapsed.num_days();
        if elapsed > Duration::days(days) {
            days += 1;
        }

        i32::try_from(days).unwrap_or(i32::MAX)
    }

    /// Late fee for `delay_days` late days.
    #[must_use]
    pub fn late_fee(policy: &LendingPolicy, delay_days: i32) -> Decimal {
        policy.late_fee_per_day * Decimal::from(delay_days.max(0))
    }

    /// Prices a payment of `installment` at `now`, with an optional voucher.
    ///
    /// # Errors
    ///
    /// Returns `VoucherInvalid` if a voucher is given but cannot be used at `now`.
    pub fn compute(
        policy: &LendingPolicy,
        installment: &InstallmentSnapshot,
        voucher: Option<&VoucherTerms>,
        now: DateTime<Utc>,
    ) -> Result<PaymentBreakdown, LendingError> {
        let discount = match voucher {
            Some(terms) => {
                VoucherEngine::ensure_valid(terms, now)?;
                VoucherEngine::discount(terms, installment.amount)
            }
            None => Decimal::ZERO,
        };

        let delay_days = Self::delay_days(installment.due_date, now);
        let fine = Self::late_fee(policy, delay_days);

        Ok(PaymentBreakdown {
            installment_amount: installment.amount,
            discount,
            delay_days,
            fine,
            amount: installment.amount - discount + fine,
        })
    }
}
