//! Entity aliases.

pub use super::borrowers::Entity as Borrowers;
pub use super::installments::Entity as Installments;
pub use super::loan_periods::Entity as LoanPeriods;
pub use super::loans::Entity as Loans;
pub use super::payments::Entity as Payments;
pub use super::vouchers::Entity as Vouchers;
