//! Payment repository.
//!
//! A payment locks, in order, the borrower, the loan, the installment, and
//! the voucher, then applies every effect inside one transaction. Any
//! failure rolls back the whole payment.

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use tenor_core::lending::{
    CreditLedger, InstallmentSnapshot, LendingError, LendingPolicy, LoanLifecycle, LoanSnapshot,
    PaymentProcessor, VoucherConsumption, VoucherEngine, VoucherTerms,
};

use crate::entities::{installments, payments, sea_orm_active_enums, vouchers};

use super::borrower::{credit_of, lock_borrower, save_credit};
use super::db_error;
use super::loan::{lock_installment, lock_loan, transition_loan};

/// Input for paying one installment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentInput {
    /// Paying borrower.
    pub borrower_id: Uuid,
    /// Loan being repaid.
    pub loan_id: Uuid,
    /// Installment being settled.
    pub installment_id: Uuid,
    /// Optional discount voucher.
    pub voucher_id: Option<Uuid>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    policy: LendingPolicy,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LendingPolicy) -> Self {
        Self { db, policy }
    }

    /// Pays an installment now.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The borrower, loan, or installment does not exist
    /// - The loan is not the borrower's, or the installment is not the loan's
    /// - The loan does not accept payments
    /// - The installment is already paid
    /// - The voucher is missing, outside its window, or out of quota
    /// - Database operation fails
    pub async fn create_payment(
        &self,
        input: CreatePaymentInput,
    ) -> Result<payments::Model, LendingError> {
        self.create_payment_at(input, Utc::now()).await
    }

    /// Pays an installment as of `now`.
    ///
    /// # Errors
    ///
    /// See [`Self::create_payment`].
    pub async fn create_payment_at(
        &self,
        input: CreatePaymentInput,
        now: DateTime<Utc>,
    ) -> Result<payments::Model, LendingError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let borrower = lock_borrower(&txn, input.borrower_id).await?;
        let loan = lock_loan(&txn, input.loan_id).await?;
        let installment = lock_installment(&txn, input.installment_id).await?;

        let loan_snapshot = LoanSnapshot {
            loan_id: loan.id,
            borrower_id: loan.borrower_id,
            status: loan.status.into(),
        };
        let installment_snapshot = InstallmentSnapshot {
            installment_id: installment.id,
            loan_id: installment.loan_id,
            amount: installment.amount,
            due_date: installment.due_date.with_timezone(&Utc),
            status: installment.status.into(),
        };
        PaymentProcessor::authorize(input.borrower_id, &loan_snapshot, &installment_snapshot)?;

        let voucher = match input.voucher_id {
            Some(voucher_id) => Some(lock_voucher(&txn, voucher_id).await?),
            None => None,
        };
        let terms = voucher.as_ref().map(voucher_terms);

        let breakdown =
            PaymentProcessor::compute(&self.policy, &installment_snapshot, terms.as_ref(), now)?;

        let paid_at: DateTimeWithTimeZone = now.into();
        mark_installment_paid(&txn, installment.id, paid_at).await?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            borrower_id: Set(input.borrower_id),
            loan_id: Set(loan.id),
            installment_id: Set(installment.id),
            voucher_id: Set(input.voucher_id),
            delay_days: Set(breakdown.delay_days),
            payment_fine: Set(breakdown.fine),
            payment_discount: Set(breakdown.discount),
            payment_amount: Set(breakdown.amount),
            payment_date: Set(paid_at),
            created_at: Set(paid_at),
        }
        .insert(&txn)
        .await
        .map_err(db_error)?;

        if let (Some(voucher), Some(terms)) = (voucher, terms) {
            consume_voucher(&txn, voucher.id, &terms).await?;
        }

        let mut credit = credit_of(&borrower);
        CreditLedger::apply_payment(
            &self.policy,
            &mut credit,
            installment.amount,
            breakdown.delay_days,
        );
        save_credit(&txn, borrower, &credit).await?;

        let total = installments::Entity::find()
            .filter(installments::Column::LoanId.eq(loan.id))
            .count(&txn)
            .await
            .map_err(db_error)?;
        let paid = installments::Entity::find()
            .filter(installments::Column::LoanId.eq(loan.id))
            .filter(installments::Column::Status.eq(sea_orm_active_enums::InstallmentStatus::Paid))
            .count(&txn)
            .await
            .map_err(db_error)?;

        let current = loan_snapshot.status;
        let next = LoanLifecycle::after_payment(&self.policy, current, paid, total)?;
        if next != current {
            transition_loan(&txn, loan.id, current, next, now).await?;
        }

        txn.commit().await.map_err(db_error)?;

        info!(
            payment_id = %payment.id,
            loan_id = %loan.id,
            installment_id = %installment.id,
            amount = %breakdown.amount,
            discount = %breakdown.discount,
            fine = %breakdown.fine,
            delay_days = breakdown.delay_days,
            loan_status = %next,
            credit_health = %credit.credit_health,
            "installment paid"
        );
        Ok(payment)
    }

    /// Lists the payments of a loan, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn payments_for_loan(
        &self,
        loan_id: Uuid,
    ) -> Result<Vec<payments::Model>, LendingError> {
        payments::Entity::find()
            .filter(payments::Column::LoanId.eq(loan_id))
            .order_by_asc(payments::Column::PaymentDate)
            .all(&self.db)
            .await
            .map_err(db_error)
    }
}

/// Flips an installment from unpaid to paid, only if it is still unpaid.
async fn mark_installment_paid<C: ConnectionTrait>(
    conn: &C,
    installment_id: Uuid,
    paid_at: DateTimeWithTimeZone,
) -> Result<(), LendingError> {
    let result = installments::Entity::update_many()
        .set(installments::ActiveModel {
            status: Set(sea_orm_active_enums::InstallmentStatus::Paid),
            paid_at: Set(Some(paid_at)),
            updated_at: Set(paid_at),
            ..Default::default()
        })
        .filter(installments::Column::Id.eq(installment_id))
        .filter(installments::Column::Status.eq(sea_orm_active_enums::InstallmentStatus::Unpaid))
        .exec(conn)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        warn!(installment_id = %installment_id, "installment paid concurrently");
        return Err(LendingError::InstallmentAlreadyPaid);
    }

    Ok(())
}

/// Loads a voucher row with `FOR UPDATE`; a missing voucher is invalid.
async fn lock_voucher<C: ConnectionTrait>(
    conn: &C,
    voucher_id: Uuid,
) -> Result<vouchers::Model, LendingError> {
    vouchers::Entity::find_by_id(voucher_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LendingError::VoucherInvalid)
}

/// Takes one use off a voucher, deleting it once the quota is spent.
async fn consume_voucher<C: ConnectionTrait>(
    conn: &C,
    voucher_id: Uuid,
    terms: &VoucherTerms,
) -> Result<(), LendingError> {
    let result = vouchers::Entity::update_many()
        .col_expr(
            vouchers::Column::Quota,
            Expr::col(vouchers::Column::Quota).sub(1),
        )
        .col_expr(vouchers::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(vouchers::Column::Id.eq(voucher_id))
        .filter(vouchers::Column::Quota.gt(0))
        .exec(conn)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        warn!(voucher_id = %voucher_id, "voucher exhausted concurrently");
        return Err(LendingError::VoucherInvalid);
    }

    if VoucherEngine::consume(terms) == VoucherConsumption::Retired {
        vouchers::Entity::delete_many()
            .filter(vouchers::Column::Id.eq(voucher_id))
            .filter(vouchers::Column::Quota.lte(0))
            .exec(conn)
            .await
            .map_err(db_error)?;
        info!(voucher_id = %voucher_id, "voucher retired");
    }

    Ok(())
}

fn voucher_terms(voucher: &vouchers::Model) -> VoucherTerms {
    VoucherTerms {
        discount_percent: voucher.discount_percent,
        quota: voucher.quota,
        active_date: voucher.active_date.with_timezone(&Utc),
        expire_date: voucher.expire_date.with_timezone(&Utc),
    }
}
