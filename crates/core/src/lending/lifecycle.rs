//! Loan and contract state machines.

use rust_decimal::Decimal;

use tenor_shared::CompletionRule;

use crate::lending::error::LendingError;
use crate::lending::policy::LendingPolicy;
use crate::lending::types::{ContractStatus, LoanStatus};

/// Maximum length of a loan name.
pub const MAX_LOAN_NAME_LEN: usize = 255;

/// Stateless service for loan status transitions.
pub struct LoanLifecycle;

impl LoanLifecycle {
    /// Validates a new loan request.
    pub fn validate_request(name: &str, amount: Decimal) -> Result<(), LendingError> {
        if name.trim().is_empty() {
            return Err(LendingError::Validation("loan name is required".to_string()));
        }
        if name.len() > MAX_LOAN_NAME_LEN {
            return Err(LendingError::Validation(format!(
                "loan name must be at most {MAX_LOAN_NAME_LEN} characters"
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(LendingError::Validation(
                "loan amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Approve a pending loan.
    ///
    /// # Returns
    /// * `Ok(LoanStatus::Active)` if the loan is pending
    /// * `Err(LendingError::InvalidTransition)` otherwise
    pub fn approve(current: LoanStatus) -> Result<LoanStatus, LendingError> {
        Self::transition(current, LoanStatus::Active)
    }

    /// Reject a pending loan.
    ///
    /// # Returns
    /// * `Ok(LoanStatus::Rejected)` if the loan is pending
    /// * `Err(LendingError::InvalidTransition)` otherwise
    pub fn reject(current: LoanStatus) -> Result<LoanStatus, LendingError> {
        Self::transition(current, LoanStatus::Rejected)
    }

    /// Status of a loan after one of its installments was paid.
    ///
    /// `paid_count` includes the installment just paid. A `PaidOff` loan
    /// stays `PaidOff`.
    pub fn after_payment(
        policy: &LendingPolicy,
        current: LoanStatus,
        paid_count: u64,
        total_count: u64,
    ) -> Result<LoanStatus, LendingError> {
        if !current.accepts_payments() {
            return Err(LendingError::LoanNotPayable(current));
        }
        if current == LoanStatus::PaidOff {
            return Ok(LoanStatus::PaidOff);
        }

        let complete = match policy.completion_rule {
            CompletionRule::AllPaid => paid_count >= total_count,
            CompletionRule::OneBeforeLast => paid_count + 1 >= total_count,
        };

        Ok(if complete {
            LoanStatus::PaidOff
        } else {
            LoanStatus::Repaying
        })
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: LoanStatus, to: LoanStatus) -> bool {
        matches!(
            (from, to),
            (LoanStatus::Pending, LoanStatus::Active | LoanStatus::Rejected)
                | (
                    LoanStatus::Active | LoanStatus::Repaying,
                    LoanStatus::Repaying | LoanStatus::PaidOff
                )
        )
    }

    fn transition(from: LoanStatus, to: LoanStatus) -> Result<LoanStatus, LendingError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(LendingError::InvalidTransition { from, to })
        }
    }
}

/// Stateless service for the borrower contract.
pub struct ContractLifecycle;

impl ContractLifecycle {
    /// Borrower confirms a contract accepted by an administrator.
    ///
    /// # Returns
    /// * `Ok(ContractStatus::Confirmed)` if the contract is accepted
    /// * `Err(LendingError::ContractAlreadyConfirmed)` if already confirmed
    /// * `Err(LendingError::ContractNotAccepted)` otherwise
    pub fn confirm(current: ContractStatus) -> Result<ContractStatus, LendingError> {
        match current {
            ContractStatus::Confirmed => Err(LendingError::ContractAlreadyConfirmed),
            ContractStatus::Accepted => Ok(ContractStatus::Confirmed),
            _ => Err(LendingError::ContractNotAccepted),
        }
    }

    /// Only confirmed borrowers may request loans.
    pub fn ensure_can_borrow(current: ContractStatus) -> Result<(), LendingError> {
        if current == ContractStatus::Confirmed {
            Ok(())
        } else {
            Err(LendingError::ContractNotConfirmed)
        }
    }
}
