//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every mutating lending operation runs inside a single database transaction.

pub mod borrower;
pub mod loan;
pub mod payment;
pub mod summary;
pub mod voucher;

pub use borrower::{BorrowerRepository, ContractUpdate};
pub use loan::{CreateLoanInput, LoanRepository, LoanWithInstallments};
pub use payment::{CreatePaymentInput, PaymentRepository};
pub use summary::SummaryRepository;
pub use voucher::VoucherRepository;

use sea_orm::DbErr;
use tenor_core::lending::LendingError;

/// Maps a persistence failure to the lending error taxonomy.
pub(crate) fn db_error(err: DbErr) -> LendingError {
    LendingError::Database(err.to_string())
}
