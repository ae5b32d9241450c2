//! Loan repository: requests, administrator decisions, and schedules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use tenor_core::lending::{
    ContractLifecycle, CreditLedger, InstallmentScheduler, LendingError, LendingPolicy,
    LoanLifecycle, LoanStatus,
};

use crate::entities::{installments, loan_periods, loans, sea_orm_active_enums};

use super::borrower::{credit_of, lock_borrower, save_credit};
use super::db_error;

/// Input for requesting a loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLoanInput {
    /// Requesting borrower.
    pub borrower_id: Uuid,
    /// Chosen loan period.
    pub loan_period_id: i32,
    /// Loan name.
    pub name: String,
    /// Requested amount, before the period percentage is applied.
    pub amount: Decimal,
}

/// A loan with its installments, ascending by due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanWithInstallments {
    /// Loan data.
    pub loan: loans::Model,
    /// Installments.
    pub installments: Vec<installments::Model>,
}

/// Loan repository.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
    policy: LendingPolicy,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LendingPolicy) -> Self {
        Self { db, policy }
    }

    /// Lists the available loan periods, shortest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_periods(&self) -> Result<Vec<loan_periods::Model>, LendingError> {
        loan_periods::Entity::find()
            .order_by_asc(loan_periods::Column::DurationMonths)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Requests a loan and reserves its effective principal.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is blank or the amount is not positive
    /// - The borrower does not exist or has not confirmed the contract
    /// - The loan period does not exist
    /// - The principal is too small to schedule over the period
    /// - The principal does not fit the borrower's credit tier
    pub async fn create_loan(&self, input: CreateLoanInput) -> Result<loans::Model, LendingError> {
        LoanLifecycle::validate_request(&input.name, input.amount)?;

        let txn = self.db.begin().await.map_err(db_error)?;

        let borrower = lock_borrower(&txn, input.borrower_id).await?;
        ContractLifecycle::ensure_can_borrow(borrower.contract_status.into())?;

        let period = loan_periods::Entity::find_by_id(input.loan_period_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::LoanPeriodNotFound(input.loan_period_id))?;

        let principal =
            CreditLedger::effective_principal(input.amount, Decimal::from(period.percentage));
        InstallmentScheduler::ensure_feasible(principal, period_duration(&period)?)?;

        let mut credit = credit_of(&borrower);
        CreditLedger::ensure_can_borrow(&self.policy, &credit, principal)?;
        CreditLedger::reserve(&mut credit, principal);
        save_credit(&txn, borrower, &credit).await?;

        let now = Utc::now().into();
        let loan = loans::ActiveModel {
            id: Set(Uuid::now_v7()),
            borrower_id: Set(input.borrower_id),
            loan_period_id: Set(period.id),
            name: Set(input.name.trim().to_string()),
            requested_amount: Set(input.amount),
            amount: Set(principal),
            status: Set(sea_orm_active_enums::LoanStatus::Pending),
            approved_at: Set(None),
            rejected_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(
            loan_id = %loan.id,
            borrower_id = %loan.borrower_id,
            amount = %loan.amount,
            credit_used = %credit.credit_used,
            "loan requested"
        );
        Ok(loan)
    }

    /// Approves a pending loan and generates its schedule.
    ///
    /// # Errors
    ///
    /// Returns `LoanNotFound`, `InvalidTransition` if the loan is not pending,
    /// or a database error.
    pub async fn approve_loan(&self, loan_id: Uuid) -> Result<LoanWithInstallments, LendingError> {
        self.approve_loan_at(loan_id, Utc::now()).await
    }

    /// Approves a pending loan, anchoring the schedule at `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::approve_loan`].
    pub async fn approve_loan_at(
        &self,
        loan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<LoanWithInstallments, LendingError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let loan = lock_loan(&txn, loan_id).await?;
        let next = LoanLifecycle::approve(loan.status.into())?;

        let period = loan_periods::Entity::find_by_id(loan.loan_period_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::LoanPeriodNotFound(loan.loan_period_id))?;
        let schedule = InstallmentScheduler::generate(
            &self.policy,
            loan.amount,
            period_duration(&period)?,
            now,
        )?;

        transition_loan(&txn, loan_id, loan.status.into(), next, now).await?;

        let created_at: DateTimeWithTimeZone = now.into();
        let rows: Vec<installments::ActiveModel> = schedule
            .iter()
            .map(|item| installments::ActiveModel {
                id: Set(Uuid::now_v7()),
                loan_id: Set(loan_id),
                sequence: Set(i32::try_from(item.sequence).unwrap_or(i32::MAX)),
                amount: Set(item.amount),
                due_date: Set(item.due_date.into()),
                status: Set(sea_orm_active_enums::InstallmentStatus::Unpaid),
                paid_at: Set(None),
                created_at: Set(created_at),
                updated_at: Set(created_at),
            })
            .collect();
        installments::Entity::insert_many(rows)
            .exec(&txn)
            .await
            .map_err(db_error)?;

        let result = load_with_installments(&txn, loan_id).await?;

        txn.commit().await.map_err(db_error)?;

        info!(
            loan_id = %loan_id,
            installments = result.installments.len(),
            "loan approved"
        );
        Ok(result)
    }

    /// Rejects a pending loan and releases its reserved credit.
    ///
    /// # Errors
    ///
    /// Returns `LoanNotFound`, `InvalidTransition` if the loan is not pending,
    /// or a database error.
    pub async fn reject_loan(&self, loan_id: Uuid) -> Result<loans::Model, LendingError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let borrower_id = loans::Entity::find_by_id(loan_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::LoanNotFound(loan_id))?
            .borrower_id;

        // borrower before loan, same order as payments
        let borrower = lock_borrower(&txn, borrower_id).await?;
        let loan = lock_loan(&txn, loan_id).await?;
        let next = LoanLifecycle::reject(loan.status.into())?;

        let now = Utc::now();
        transition_loan(&txn, loan_id, loan.status.into(), next, now).await?;

        let mut credit = credit_of(&borrower);
        CreditLedger::release(&mut credit, loan.amount);
        save_credit(&txn, borrower, &credit).await?;

        let rejected = loans::Entity::find_by_id(loan_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::LoanNotFound(loan_id))?;

        txn.commit().await.map_err(db_error)?;

        info!(
            loan_id = %loan_id,
            borrower_id = %borrower_id,
            released = %loan.amount,
            "loan rejected"
        );
        Ok(rejected)
    }

    /// Gets a loan with its installments.
    ///
    /// # Errors
    ///
    /// Returns `LoanNotFound` if the loan does not exist.
    pub async fn get_loan(&self, loan_id: Uuid) -> Result<LoanWithInstallments, LendingError> {
        load_with_installments(&self.db, loan_id).await
    }

    /// Lists a borrower's loans, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_borrower_loans(
        &self,
        borrower_id: Uuid,
    ) -> Result<Vec<loans::Model>, LendingError> {
        loans::Entity::find()
            .filter(loans::Column::BorrowerId.eq(borrower_id))
            .order_by_desc(loans::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Gets an installment by ID.
    ///
    /// # Errors
    ///
    /// Returns `InstallmentNotFound` if the installment does not exist.
    pub async fn get_installment(
        &self,
        installment_id: Uuid,
    ) -> Result<installments::Model, LendingError> {
        installments::Entity::find_by_id(installment_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::InstallmentNotFound(installment_id))
    }

    /// Moves the due date of an unpaid installment.
    ///
    /// # Errors
    ///
    /// Returns `InstallmentNotFound` or `InstallmentAlreadyPaid`.
    pub async fn reschedule_installment(
        &self,
        installment_id: Uuid,
        due_date: DateTime<Utc>,
    ) -> Result<installments::Model, LendingError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let installment = lock_installment(&txn, installment_id).await?;
        if installment.status == sea_orm_active_enums::InstallmentStatus::Paid {
            return Err(LendingError::InstallmentAlreadyPaid);
        }

        let mut active: installments::ActiveModel = installment.into();
        active.due_date = Set(due_date.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(installment_id = %installment_id, due_date = %due_date, "installment rescheduled");
        Ok(updated)
    }
}

fn period_duration(period: &loan_periods::Model) -> Result<u32, LendingError> {
    u32::try_from(period.duration_months).map_err(|_| {
        LendingError::Validation(format!("loan period {} has an invalid duration", period.id))
    })
}

/// Loads a loan row with `FOR UPDATE`.
pub(crate) async fn lock_loan<C: ConnectionTrait>(
    conn: &C,
    loan_id: Uuid,
) -> Result<loans::Model, LendingError> {
    loans::Entity::find_by_id(loan_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LendingError::LoanNotFound(loan_id))
}

/// Loads an installment row with `FOR UPDATE`.
pub(crate) async fn lock_installment<C: ConnectionTrait>(
    conn: &C,
    installment_id: Uuid,
) -> Result<installments::Model, LendingError> {
    installments::Entity::find_by_id(installment_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LendingError::InstallmentNotFound(installment_id))
}

/// Moves a loan from `from` to `to`, only if it is still in `from`.
///
/// Zero affected rows means another writer moved the loan first.
pub(crate) async fn transition_loan<C: ConnectionTrait>(
    conn: &C,
    loan_id: Uuid,
    from: LoanStatus,
    to: LoanStatus,
    now: DateTime<Utc>,
) -> Result<(), LendingError> {
    let stamp: DateTimeWithTimeZone = now.into();
    let update = loans::ActiveModel {
        status: Set(to.into()),
        updated_at: Set(stamp),
        approved_at: if to == LoanStatus::Active {
            Set(Some(stamp))
        } else {
            Default::default()
        },
        rejected_at: if to == LoanStatus::Rejected {
            Set(Some(stamp))
        } else {
            Default::default()
        },
        ..Default::default()
    };

    let result = loans::Entity::update_many()
        .set(update)
        .filter(loans::Column::Id.eq(loan_id))
        .filter(loans::Column::Status.eq(sea_orm_active_enums::LoanStatus::from(from)))
        .exec(conn)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        warn!(loan_id = %loan_id, from = %from, to = %to, "loan status changed concurrently");
        return Err(LendingError::InvalidTransition { from, to });
    }

    Ok(())
}

async fn load_with_installments<C: ConnectionTrait>(
    conn: &C,
    loan_id: Uuid,
) -> Result<LoanWithInstallments, LendingError> {
    let loan = loans::Entity::find_by_id(loan_id)
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LendingError::LoanNotFound(loan_id))?;

    let installments = installments::Entity::find()
        .filter(installments::Column::LoanId.eq(loan_id))
        .order_by_asc(installments::Column::DueDate)
        .order_by_asc(installments::Column::Sequence)
        .all(conn)
        .await
        .map_err(db_error)?;

    Ok(LoanWithInstallments { loan, installments })
}
