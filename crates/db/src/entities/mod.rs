//! `SeaORM` entities for the lending schema.

pub mod prelude;

pub mod borrowers;
pub mod installments;
pub mod loan_periods;
pub mod loans;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod vouchers;
