//! Voucher repository.

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use tenor_core::lending::{LendingError, NewVoucher, VoucherEngine};

use crate::entities::vouchers;

use super::db_error;

/// Voucher repository.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    db: DatabaseConnection,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a voucher.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name, a discount outside 1..=100, a
    /// quota below 1, or a window that ends before it starts.
    pub async fn create(&self, input: NewVoucher) -> Result<vouchers::Model, LendingError> {
        VoucherEngine::validate_new(&input)?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let voucher = vouchers::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.trim().to_string()),
            discount_percent: Set(input.discount_percent),
            quota: Set(input.quota),
            active_date: Set(input.active_date.into()),
            expire_date: Set(input.expire_date.into()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        info!(voucher_id = %voucher.id, quota = voucher.quota, "voucher created");
        Ok(voucher)
    }

    /// Gets a voucher by ID.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if the voucher does not exist.
    pub async fn get(&self, voucher_id: Uuid) -> Result<vouchers::Model, LendingError> {
        vouchers::Entity::find_by_id(voucher_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::VoucherNotFound(voucher_id))
    }

    /// Replaces every editable field of a voucher.
    ///
    /// The row is locked so an update never interleaves with a payment
    /// consuming the same voucher.
    ///
    /// # Errors
    ///
    /// Returns `Validation` under the same rules as [`Self::create`], or
    /// `VoucherNotFound` if the voucher does not exist.
    pub async fn update(
        &self,
        voucher_id: Uuid,
        input: NewVoucher,
    ) -> Result<vouchers::Model, LendingError> {
        VoucherEngine::validate_new(&input)?;

        let txn = self.db.begin().await.map_err(db_error)?;

        let voucher = vouchers::Entity::find_by_id(voucher_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(LendingError::VoucherNotFound(voucher_id))?;

        let mut active: vouchers::ActiveModel = voucher.into();
        active.name = Set(input.name.trim().to_string());
        active.discount_percent = Set(input.discount_percent);
        active.quota = Set(input.quota);
        active.active_date = Set(input.active_date.into());
        active.expire_date = Set(input.expire_date.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        info!(voucher_id = %voucher_id, quota = updated.quota, "voucher updated");
        Ok(updated)
    }

    /// Deletes a voucher.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if the voucher does not exist.
    pub async fn delete(&self, voucher_id: Uuid) -> Result<(), LendingError> {
        let result = vouchers::Entity::delete_by_id(voucher_id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(LendingError::VoucherNotFound(voucher_id));
        }

        info!(voucher_id = %voucher_id, "voucher deleted");
        Ok(())
    }

    /// Lists vouchers usable at `now`, soonest to expire first.
    ///
    /// Read-only: expired vouchers are left for [`Self::purge_expired`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_available(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<vouchers::Model>, LendingError> {
        vouchers::Entity::find()
            .filter(vouchers::Column::Quota.gt(0))
            .filter(vouchers::Column::ActiveDate.lte(now))
            .filter(vouchers::Column::ExpireDate.gte(now))
            .order_by_asc(vouchers::Column::ExpireDate)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Deletes every voucher whose window closed before `now`.
    ///
    /// Returns the number of deleted vouchers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, LendingError> {
        let result = vouchers::Entity::delete_many()
            .filter(vouchers::Column::ExpireDate.lt(now))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            info!(purged = result.rows_affected, "expired vouchers purged");
        }
        Ok(result.rows_affected)
    }
}
