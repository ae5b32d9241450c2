//! Lending error types.
//!
//! Every public lending operation fails with exactly one of these
//! variants. Each variant belongs to one `ErrorKind`, which tells the
//! delivery layer whether the caller broke a rule, referenced something
//! missing, or hit an infrastructure failure.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use tenor_shared::AppError;

use crate::lending::types::LoanStatus;

/// Error taxonomy used to map lending failures to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A business rule refused the request.
    DomainRule,
    /// A referenced entity does not exist.
    NotFound,
    /// Persistence or configuration failure.
    Internal,
}

/// Errors that can occur during lending operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LendingError {
    /// Borrower not found.
    #[error("Borrower {0} not found")]
    BorrowerNotFound(Uuid),

    /// Loan not found.
    #[error("Loan {0} not found")]
    LoanNotFound(Uuid),

    /// Installment not found.
    #[error("Installment {0} not found")]
    InstallmentNotFound(Uuid),

    /// Loan period not found.
    #[error("Loan period {0} not found")]
    LoanPeriodNotFound(i32),

    /// Voucher not found.
    #[error("Voucher {0} not found")]
    VoucherNotFound(Uuid),

    /// Loan requested before the contract was confirmed.
    #[error("Contract not confirmed.")]
    ContractNotConfirmed,

    /// Contract confirmed twice.
    #[error("Contract already confirmed.")]
    ContractAlreadyConfirmed,

    /// Contract confirmed before an administrator accepted it.
    #[error("Contract not accepted.")]
    ContractNotAccepted,

    /// Principal does not fit the remaining credit limit.
    #[error("Loan amount {requested} exceeds available credit {available}.")]
    ExceedsCreditLimit {
        /// Requested effective principal.
        requested: Decimal,
        /// Credit still available.
        available: Decimal,
    },

    /// Principal does not fit the reduced limit of a `Warning` tier borrower.
    #[error("Loan amount {requested} exceeds available warning-tier credit {available}.")]
    ExceedsCreditLimitWarning {
        /// Requested effective principal.
        requested: Decimal,
        /// Credit still available under the reduced limit.
        available: Decimal,
    },

    /// Borrower is in the `Blocked` tier.
    #[error("Credit health status blocked.")]
    CreditHealthBlocked,

    /// Loan, installment and borrower do not belong together.
    #[error("Lending installment does not match.")]
    LoanInstallmentMismatch,

    /// Installment already settled.
    #[error("Installment already paid.")]
    InstallmentAlreadyPaid,

    /// Voucher missing, not active yet, expired, or out of quota.
    #[error("Voucher is not valid.")]
    VoucherInvalid,

    /// Loan is not in a state that accepts payments.
    #[error("Loan in status {0} does not accept payments.")]
    LoanNotPayable(LoanStatus),

    /// Attempted an invalid loan status transition.
    #[error("Invalid loan status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: LoanStatus,
        /// The attempted target status.
        to: LoanStatus,
    },

    /// Input rejected by a lending rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lending policy could not be built.
    #[error("Invalid lending policy: {0}")]
    Configuration(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LendingError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BorrowerNotFound(_)
            | Self::LoanNotFound(_)
            | Self::InstallmentNotFound(_)
            | Self::LoanPeriodNotFound(_)
            | Self::VoucherNotFound(_) => ErrorKind::NotFound,

            Self::Configuration(_) | Self::Database(_) => ErrorKind::Internal,

            _ => ErrorKind::DomainRule,
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Always the status of the `AppError` this error converts into.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        AppError::from(self.clone()).status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BorrowerNotFound(_) => "BORROWER_NOT_FOUND",
            Self::LoanNotFound(_) => "LOAN_NOT_FOUND",
            Self::InstallmentNotFound(_) => "INSTALLMENT_NOT_FOUND",
            Self::LoanPeriodNotFound(_) => "LOAN_PERIOD_NOT_FOUND",
            Self::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            Self::ContractNotConfirmed => "CONTRACT_NOT_CONFIRMED",
            Self::ContractAlreadyConfirmed => "CONTRACT_ALREADY_CONFIRMED",
            Self::ContractNotAccepted => "CONTRACT_NOT_ACCEPTED",
            Self::ExceedsCreditLimit { .. } => "EXCEEDS_CREDIT_LIMIT",
            Self::ExceedsCreditLimitWarning { .. } => "EXCEEDS_CREDIT_LIMIT_WARNING",
            Self::CreditHealthBlocked => "CREDIT_HEALTH_BLOCKED",
            Self::LoanInstallmentMismatch => "LOAN_INSTALLMENT_MISMATCH",
            Self::InstallmentAlreadyPaid => "INSTALLMENT_ALREADY_PAID",
            Self::VoucherInvalid => "VOUCHER_INVALID",
            Self::LoanNotPayable(_) => "LOAN_NOT_PAYABLE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<LendingError> for AppError {
    fn from(err: LendingError) -> Self {
        let message = err.to_string();
        match err {
            LendingError::Validation(msg) => Self::Validation(msg),
            LendingError::InstallmentAlreadyPaid | LendingError::InvalidTransition { .. } => {
                Self::Conflict(message)
            }
            LendingError::Configuration(msg) => Self::Config(msg),
            LendingError::Database(msg) => Self::Database(msg),
            other => match other.kind() {
                ErrorKind::NotFound => Self::NotFound(message),
                ErrorKind::DomainRule => Self::BusinessRule(message),
                ErrorKind::Internal => Self::Internal(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found_errors() {
        let id = Uuid::nil();
        for err in [
            LendingError::BorrowerNotFound(id),
            LendingError::LoanNotFound(id),
            LendingError::InstallmentNotFound(id),
            LendingError::LoanPeriodNotFound(7),
            LendingError::VoucherNotFound(id),
        ] {
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert_eq!(err.status_code(), 404);
        }
    }

    #[test]
    fn test_domain_rule_errors() {
        for err in [
            LendingError::ContractNotConfirmed,
            LendingError::ContractAlreadyConfirmed,
            LendingError::ContractNotAccepted,
            LendingError::CreditHealthBlocked,
            LendingError::LoanInstallmentMismatch,
            LendingError::VoucherInvalid,
            LendingError::LoanNotPayable(LoanStatus::Pending),
        ] {
            assert_eq!(err.kind(), ErrorKind::DomainRule);
            assert_eq!(err.status_code(), 422);
        }
    }

    #[test]
    fn test_exceeds_limit_error() {
        let err = LendingError::ExceedsCreditLimit {
            requested: dec!(1),
            available: dec!(0),
        };
        assert_eq!(err.kind(), ErrorKind::DomainRule);
        assert_eq!(err.error_code(), "EXCEEDS_CREDIT_LIMIT");
        assert!(err.to_string().contains("exceeds available credit"));
    }

    #[test]
    fn test_conflict_errors() {
        let err = LendingError::InvalidTransition {
            from: LoanStatus::Active,
            to: LoanStatus::Rejected,
        };
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("active"));
        assert!(err.to_string().contains("rejected"));
        assert_eq!(LendingError::InstallmentAlreadyPaid.status_code(), 409);
    }

    #[test]
    fn test_internal_errors() {
        assert_eq!(LendingError::Validation("blank".into()).status_code(), 400);

        let err = LendingError::Database("connection reset".into());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_status_code_matches_app_error() {
        let id = Uuid::nil();
        for err in [
            LendingError::BorrowerNotFound(id),
            LendingError::LoanPeriodNotFound(1),
            LendingError::ContractNotConfirmed,
            LendingError::ExceedsCreditLimitWarning {
                requested: dec!(2),
                available: dec!(1),
            },
            LendingError::CreditHealthBlocked,
            LendingError::VoucherInvalid,
            LendingError::InstallmentAlreadyPaid,
            LendingError::InvalidTransition {
                from: LoanStatus::Rejected,
                to: LoanStatus::Active,
            },
            LendingError::Validation("amount".into()),
            LendingError::Configuration("due day".into()),
            LendingError::Database("timeout".into()),
        ] {
            let app: AppError = err.clone().into();
            assert_eq!(err.status_code(), app.status_code(), "{err:?}");
        }
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = LendingError::InstallmentAlreadyPaid.into();
        assert!(matches!(app, AppError::Conflict(_)));
        assert_eq!(app.public_message(), "Installment already paid.");

        let app: AppError = LendingError::LoanNotFound(Uuid::nil()).into();
        assert!(matches!(app, AppError::NotFound(_)));

        let app: AppError = LendingError::ContractNotConfirmed.into();
        assert!(matches!(app, AppError::BusinessRule(_)));

        let app: AppError = LendingError::Validation("name is required".into()).into();
        assert!(matches!(app, AppError::Validation(ref m) if m == "name is required"));

        let app: AppError = LendingError::Database("boom".into()).into();
        assert_eq!(app.status_code(), 500);
        assert!(!app.public_message().contains("boom"));
    }
}
