//! Lending domain types.
//!
//! Every entity gets its own named status enumeration so that a loan
//! status can never be confused with an installment or contract status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Risk tier derived from a borrower's repayment delay history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditHealth {
    /// Full credit limit available.
    Good,
    /// Only part of the credit limit is available.
    Warning,
    /// No new loans allowed.
    Blocked,
}

impl CreditHealth {
    /// Returns the string representation of the tier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Blocked => "blocked",
        }
    }

    /// Parses a tier from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "good" => Some(Self::Good),
            "warning" => Some(Self::Warning),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

impl fmt::Display for CreditHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Borrower onboarding state.
///
/// An administrator reviews the borrower and moves them to `Accepted`;
/// the borrower then confirms the contract, reaching `Confirmed`. Only
/// confirmed borrowers may request loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Registered, nothing reviewed yet.
    Unconfirmed,
    /// Waiting for an administrator decision.
    PendingReview,
    /// Refused by an administrator.
    Rejected,
    /// Granted by an administrator, waiting for the borrower.
    Accepted,
    /// Accepted by both sides.
    Confirmed,
}

impl ContractStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfirmed => "unconfirmed",
            Self::PendingReview => "pending_review",
            Self::Rejected => "rejected",
            Self::Accepted => "accepted",
            Self::Confirmed => "confirmed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unconfirmed" => Some(Self::Unconfirmed),
            "pending_review" => Some(Self::PendingReview),
            "rejected" => Some(Self::Rejected),
            "accepted" => Some(Self::Accepted),
            "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loan status.
///
/// The valid transitions are:
/// - Pending → Active (approve, schedule generated)
/// - Pending → Rejected (reject, credit released)
/// - Active → Repaying (first non-final payment)
/// - Active | Repaying → PaidOff (completing payment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Requested by the borrower, waiting for review.
    Pending,
    /// Approved with a generated schedule, nothing paid yet.
    Active,
    /// At least one installment paid, loan not complete.
    Repaying,
    /// Loan complete.
    PaidOff,
    /// Refused by an administrator.
    Rejected,
}

impl LoanStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Repaying => "repaying",
            Self::PaidOff => "paid_off",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "repaying" => Some(Self::Repaying),
            "paid_off" => Some(Self::PaidOff),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if installments of this loan can be paid.
    ///
    /// `PaidOff` stays payable so a trailing installment can still be
    /// settled under the one-before-last completion rule.
    #[must_use]
    pub fn accepts_payments(&self) -> bool {
        matches!(self, Self::Active | Self::Repaying | Self::PaidOff)
    }

    /// Returns true if the loan counts as disbursed money.
    #[must_use]
    pub fn is_disbursed(&self) -> bool {
        matches!(self, Self::Active | Self::Repaying | Self::PaidOff)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Installment status. An installment goes from `Unpaid` to `Paid` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Not settled yet.
    Unpaid,
    /// Settled by a payment.
    Paid,
}

impl InstallmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The credit-related part of a borrower record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowerCredit {
    /// Maximum principal the borrower may hold.
    pub credit_limit: Decimal,
    /// Principal currently reserved by loans.
    pub credit_used: Decimal,
    /// Accumulated late days, decayed by on-time payments.
    pub total_delay: i32,
    /// Current risk tier.
    pub credit_health: CreditHealth,
}

/// A loan waiting for an administrator decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingLoan {
    /// Loan ID.
    pub loan_id: Uuid,
    /// Borrower who requested the loan.
    pub borrower_id: Uuid,
    /// Loan name given by the borrower.
    pub name: String,
    /// Effective principal.
    pub amount: Decimal,
    /// When the loan was requested.
    pub created_at: DateTime<Utc>,
}

/// A borrower waiting for contract review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingBorrower {
    /// Borrower ID.
    pub borrower_id: Uuid,
    /// Borrower full name.
    pub full_name: String,
    /// Borrower email.
    pub email: String,
    /// When the borrower registered.
    pub created_at: DateTime<Utc>,
}

/// Aggregate figures for the administrator overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendingSummary {
    /// Number of registered borrowers.
    pub borrower_count: u64,
    /// Number of loans currently being repaid (`Active` or `Repaying`).
    pub active_loan_total: u64,
    /// Sum of principal over every approved loan.
    pub total_disbursed: Decimal,
    /// Sum of every recorded payment amount.
    pub total_collected: Decimal,
    /// Loans waiting for approval, oldest first.
    pub pending_loans: Vec<PendingLoan>,
    /// Borrowers waiting for contract review, oldest first.
    pub pending_onboarding: Vec<PendingBorrower>,
}
