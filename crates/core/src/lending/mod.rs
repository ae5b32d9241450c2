//! Installment lending rules for Tenor.
//!
//! This module implements the credit-limit accounting, installment
//! scheduling, voucher discounts, payment computation, and the loan and
//! contract state machines. Everything here is pure: callers load entities,
//! hand snapshots in, and persist what comes back.
//!
//! # Modules
//!
//! - `types` - Status enumerations and entity snapshots
//! - `error` - Lending error taxonomy
//! - `policy` - Tunable business constants
//! - `credit` - Credit ledger and health tiers
//! - `schedule` - Installment schedule generation
//! - `voucher` - Voucher validation and consumption
//! - `payment` - Installment payment computation
//! - `lifecycle` - Loan and contract state machines

pub mod credit;
pub mod error;
pub mod lifecycle;
pub mod payment;
pub mod policy;
pub mod schedule;
pub mod types;
pub mod voucher;

#[cfg(test)]
mod credit_props;
#[cfg(test)]
mod payment_props;
#[cfg(test)]
mod schedule_props;

pub use credit::{BorrowDecision, CreditLedger};
pub use error::{ErrorKind, LendingError};
pub use lifecycle::{ContractLifecycle, LoanLifecycle};
pub use payment::{InstallmentSnapshot, LoanSnapshot, PaymentBreakdown, PaymentProcessor};
pub use policy::LendingPolicy;
pub use schedule::{InstallmentScheduler, ScheduledInstallment};
pub use types::{
    BorrowerCredit, ContractStatus, CreditHealth, InstallmentStatus, LendingSummary, LoanStatus,
    PendingBorrower, PendingLoan,
};
pub use voucher::{NewVoucher, VoucherConsumption, VoucherEngine, VoucherTerms, VoucherValidity};
