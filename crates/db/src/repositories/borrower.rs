//! Borrower repository: onboarding and contract management.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use tenor_core::lending::{
    BorrowerCredit, ContractLifecycle, ContractStatus, CreditHealth, LendingError,
};

use crate::entities::{borrowers, sea_orm_active_enums};

use super::db_error;

/// Administrator changes to a borrower's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractUpdate {
    /// New credit limit.
    pub credit_limit: Decimal,
    /// New health tier.
    pub credit_health: CreditHealth,
    /// New contract status.
    pub contract_status: ContractStatus,
}

/// Borrower repository.
#[derive(Debug, Clone)]
pub struct BorrowerRepository {
    db: DatabaseConnection,
}

impl BorrowerRepository {
    /// Creates a new borrower repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a borrower with no credit and an unconfirmed contract.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name or email, or an email that is
    /// already registered.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
    ) -> Result<borrowers::Model, LendingError> {
        let full_name = full_name.trim();
        let email = email.trim().to_lowercase();
        if full_name.is_empty() || email.is_empty() {
            return Err(LendingError::Validation(
                "full name and email are required".to_string(),
            ));
        }

        let existing = borrowers::Entity::find()
            .filter(borrowers::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error)?;
        if existing.is_some() {
            return Err(LendingError::Validation(format!(
                "email {email} is already registered"
            )));
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let borrower = borrowers::ActiveModel {
            id: Set(Uuid::now_v7()),
            full_name: Set(full_name.to_string()),
            email: Set(email),
            credit_limit: Set(Decimal::ZERO),
            credit_used: Set(Decimal::ZERO),
            total_delay: Set(0),
            credit_health: Set(sea_orm_active_enums::CreditHealth::Good),
            contract_status: Set(sea_orm_active_enums::ContractStatus::Unconfirmed),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        info!(borrower_id = %borrower.id, "borrower registered");
        Ok(borrower)
    }

    /// Gets a borrower by ID.
    ///
    /// # Errors
    ///
    /// Returns `BorrowerNotFound` if the borrower does not exist.
    pub async fn get(&self, borrower_id: Uuid) -> Result<borrowers::Model, LendingError> {
        borrowers::Entity::find_by_id(borrower_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::BorrowerNotFound(borrower_id))
    }

    /// Replaces the contract terms of a borrower.
    ///
    /// # Errors
    ///
    /// Returns `BorrowerNotFound` or `Validation` for a negative limit.
    pub async fn update_contract(
        &self,
        borrower_id: Uuid,
        update: ContractUpdate,
    ) -> Result<borrowers::Model, LendingError> {
        if update.credit_limit.is_sign_negative() {
            return Err(LendingError::Validation(
                "credit limit cannot be negative".to_string(),
            ));
        }

        let txn = self.db.begin().await.map_err(db_error)?;

        let borrower = lock_borrower(&txn, borrower_id).await?;

        let mut active: borrowers::ActiveModel = borrower.into();
        active.credit_limit = Set(update.credit_limit);
        active.credit_health = Set(update.credit_health.into());
        active.contract_status = Set(update.contract_status.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(
            borrower_id = %borrower_id,
            credit_limit = %update.credit_limit,
            credit_health = %update.credit_health,
            contract_status = %update.contract_status,
            "borrower contract updated"
        );
        Ok(updated)
    }

    /// Borrower confirms a contract accepted by an administrator.
    ///
    /// # Errors
    ///
    /// Returns `BorrowerNotFound`, `ContractAlreadyConfirmed`, or
    /// `ContractNotAccepted`.
    pub async fn confirm_contract(
        &self,
        borrower_id: Uuid,
    ) -> Result<borrowers::Model, LendingError> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let borrower = lock_borrower(&txn, borrower_id).await?;
        let next = ContractLifecycle::confirm(borrower.contract_status.into())?;

        let mut active: borrowers::ActiveModel = borrower.into();
        active.contract_status = Set(next.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(borrower_id = %borrower_id, "borrower contract confirmed");
        Ok(updated)
    }
}

/// Loads a borrower row with `FOR UPDATE`.
pub(crate) async fn lock_borrower<C: ConnectionTrait>(
    conn: &C,
    borrower_id: Uuid,
) -> Result<borrowers::Model, LendingError> {
    borrowers::Entity::find_by_id(borrower_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LendingError::BorrowerNotFound(borrower_id))
}

/// Credit fields of a borrower row.
pub(crate) fn credit_of(borrower: &borrowers::Model) -> BorrowerCredit {
    BorrowerCredit {
        credit_limit: borrower.credit_limit,
        credit_used: borrower.credit_used,
        total_delay: borrower.total_delay,
        credit_health: borrower.credit_health.into(),
    }
}

/// Writes updated credit fields back to a borrower row.
pub(crate) async fn save_credit<C: ConnectionTrait>(
    conn: &C,
    borrower: borrowers::Model,
    credit: &BorrowerCredit,
) -> Result<borrowers::Model, LendingError> {
    let mut active: borrowers::ActiveModel = borrower.into();
    active.credit_used = Set(credit.credit_used);
    active.total_delay = Set(credit.total_delay);
    active.credit_health = Set(credit.credit_health.into());
    active.updated_at = Set(Utc::now().into());
    active.update(conn).await.map_err(db_error)
}
