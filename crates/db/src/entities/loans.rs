//! `SeaORM` Entity for loans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LoanStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub borrower_id: Uuid,
    pub loan_period_id: i32,
    pub name: String,
    /// Amount requested by the borrower.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub requested_amount: Decimal,
    /// Effective principal reserved against the credit limit.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub status: LoanStatus,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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
        belongs_to = "super::loan_periods::Entity",
        from = "Column::LoanPeriodId",
        to = "super::loan_periods::Column::Id"
    )]
    LoanPeriods,
    #[sea_orm(has_many = "super::installments::Entity")]
    Installments,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::borrowers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowers.def()
    }
}

impl Related<super::loan_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoanPeriods.def()
    }
}

impl Related<super::installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
