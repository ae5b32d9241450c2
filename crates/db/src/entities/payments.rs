//! `SeaORM` Entity for payments table.
//!
//! `voucher_id` carries no foreign key: exhausted vouchers are deleted,
//! and the payment keeps the reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub loan_id: Uuid,
    #[sea_orm(unique)]
    pub installment_id: Uuid,
    pub voucher_id: Option<Uuid>,
    pub delay_days: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub payment_fine: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub payment_discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub payment_amount: Decimal,
    pub payment_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::borrowers::Entity",
        from = "Column::BorrowerId",
        to = "super::borrowers::Column::Id"
    )]
    Borrowers,
    #[sea_orm(
        belongs_to = "super::loans::Entity",
        from = "Column::LoanId",
        to = "super::loans::Column::Id"
    )]
    Loans,
    #[sea_orm(
        belongs_to = "super::installments::Entity",
        from = "Column::InstallmentId",
        to = "super::installments::Column::Id"
    )]
    Installments,
}

impl Related<super::borrowers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowers.def()
    }
}

impl Related<super::loans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
