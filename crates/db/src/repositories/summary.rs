//! Administrator summary queries.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use tenor_core::lending::{LendingError, LendingSummary, PendingBorrower, PendingLoan};

use crate::entities::{
    borrowers, loans, payments,
    sea_orm_active_enums::{ContractStatus, LoanStatus},
};

use super::db_error;

/// Summary repository.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    db: DatabaseConnection,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the administrator overview.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn summary(&self) -> Result<LendingSummary, LendingError> {
        let borrower_count = borrowers::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_error)?;

        let active_loan_total = loans::Entity::find()
            .filter(loans::Column::Status.is_in([LoanStatus::Active, LoanStatus::Repaying]))
            .count(&self.db)
            .await
            .map_err(db_error)?;

        let total_disbursed: Option<Option<Decimal>> = loans::Entity::find()
            .filter(loans::Column::Status.is_in([
                LoanStatus::Active,
                LoanStatus::Repaying,
                LoanStatus::PaidOff,
            ]))
            .select_only()
            .column_as(loans::Column::Amount.sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_error)?;

        let total_collected: Option<Option<Decimal>> = payments::Entity::find()
            .select_only()
            .column_as(payments::Column::PaymentAmount.sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_error)?;

        let pending_loans = loans::Entity::find()
            .filter(loans::Column::Status.eq(LoanStatus::Pending))
            .order_by_asc(loans::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|loan| PendingLoan {
                loan_id: loan.id,
                borrower_id: loan.borrower_id,
                name: loan.name,
                amount: loan.amount,
                created_at: loan.created_at.with_timezone(&Utc),
            })
            .collect();

        let pending_onboarding = borrowers::Entity::find()
            .filter(borrowers::Column::ContractStatus.eq(ContractStatus::PendingReview))
            .order_by_asc(borrowers::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|borrower| PendingBorrower {
                borrower_id: borrower.id,
                full_name: borrower.full_name,
                email: borrower.email,
                created_at: borrower.created_at.with_timezone(&Utc),
            })
            .collect();

        Ok(LendingSummary {
            borrower_count,
            active_loan_total,
            total_disbursed: total_disbursed.flatten().unwrap_or(Decimal::ZERO),
            total_collected: total_collected.flatten().unwrap_or(Decimal::ZERO),
            pending_loans,
            pending_onboarding,
        })
    }
}
