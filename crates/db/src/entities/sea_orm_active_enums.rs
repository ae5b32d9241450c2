//! Postgres enum types and their conversions to the core status enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tenor_core::lending;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "credit_health")]
pub enum CreditHealth {
    #[sea_orm(string_value = "good")]
    Good,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "blocked")]
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_status")]
pub enum ContractStatus {
    #[sea_orm(string_value = "unconfirmed")]
    Unconfirmed,
    #[sea_orm(string_value = "pending_review")]
    PendingReview,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "loan_status")]
pub enum LoanStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "repaying")]
    Repaying,
    #[sea_orm(string_value = "paid_off")]
    PaidOff,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "installment_status")]
pub enum InstallmentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<CreditHealth> for lending::CreditHealth {
    fn from(value: CreditHealth) -> Self {
        match value {
            CreditHealth::Good => Self::Good,
            CreditHealth::Warning => Self::Warning,
            CreditHealth::Blocked => Self::Blocked,
        }
    }
}

impl From<lending::CreditHealth> for CreditHealth {
    fn from(value: lending::CreditHealth) -> Self {
        match value {
            lending::CreditHealth::Good => Self::Good,
            lending::CreditHealth::Warning => Self::Warning,
            lending::CreditHealth::Blocked => Self::Blocked,
        }
    }
}

impl From<ContractStatus> for lending::ContractStatus {
    fn from(value: ContractStatus) -> Self {
        match value {
            ContractStatus::Unconfirmed => Self::Unconfirmed,
            ContractStatus::PendingReview => Self::PendingReview,
            ContractStatus::Rejected => Self::Rejected,
            ContractStatus::Accepted => Self::Accepted,
            ContractStatus::Confirmed => Self::Confirmed,
        }
    }
}

impl From<lending::ContractStatus> for ContractStatus {
    fn from(value: lending::ContractStatus) -> Self {
        match value {
            lending::ContractStatus::Unconfirmed => Self::Unconfirmed,
            lending::ContractStatus::PendingReview => Self::PendingReview,
            lending::ContractStatus::Rejected => Self::Rejected,
            lending::ContractStatus::Accepted => Self::Accepted,
            lending::ContractStatus::Confirmed => Self::Confirmed,
        }
    }
}

impl From<LoanStatus> for lending::LoanStatus {
    fn from(value: LoanStatus) -> Self {
        match value {
            LoanStatus::Pending => Self::Pending,
            LoanStatus::Active => Self::Active,
            LoanStatus::Repaying => Self::Repaying,
            LoanStatus::PaidOff => Self::PaidOff,
            LoanStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<lending::LoanStatus> for LoanStatus {
    fn from(value: lending::LoanStatus) -> Self {
        match value {
            lending::LoanStatus::Pending => Self::Pending,
            lending::LoanStatus::Active => Self::Active,
            lending::LoanStatus::Repaying => Self::Repaying,
            lending::LoanStatus::PaidOff => Self::PaidOff,
            lending::LoanStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<InstallmentStatus> for lending::InstallmentStatus {
    fn from(value: InstallmentStatus) -> Self {
        match value {
            InstallmentStatus::Unpaid => Self::Unpaid,
            InstallmentStatus::Paid => Self::Paid,
        }
    }
}

impl From<lending::InstallmentStatus> for InstallmentStatus {
    fn from(value: lending::InstallmentStatus) -> Self {
        match value {
            lending::InstallmentStatus::Unpaid => Self::Unpaid,
            lending::InstallmentStatus::Paid => Self::Paid,
        }
    }
}
