//! PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `account_nature` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_nature")]
pub enum AccountNature {
    /// Asset.
    #[sea_orm(string_value = "ASSET")]
    Asset,
    /// Liability.
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    /// Equity.
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    /// Income.
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Expense.
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

/// `voucher_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "voucher_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherStatus {
    /// Draft.
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Posted.
    #[sea_orm(string_value = "POSTED")]
    Posted,
}

impl From<AccountNature> for ledgerflow_core::account::AccountNature {
    fn from(nature: AccountNature) -> Self {
        match nature {
            AccountNature::Asset => Self::Asset,
            AccountNature::Liability => Self::Liability,
            AccountNature::Equity => Self::Equity,
            AccountNature::Income => Self::Income,
            AccountNature::Expense => Self::Expense,
        }
    }
}

impl From<ledgerflow_core::account::AccountNature> for AccountNature {
    fn from(nature: ledgerflow_core::account::AccountNature) -> Self {
        use ledgerflow_core::account::AccountNature as Core;
        match nature {
            Core::Asset => Self::Asset,
            Core::Liability => Self::Liability,
            Core::Equity => Self::Equity,
            Core::Income => Self::Income,
            Core::Expense => Self::Expense,
        }
    }
}

impl From<ledgerflow_core::ledger::VoucherStatus> for VoucherStatus {
    fn from(status: ledgerflow_core::ledger::VoucherStatus) -> Self {
        match status {
            ledgerflow_core::ledger::VoucherStatus::Draft => Self::Draft,
            ledgerflow_core::ledger::VoucherStatus::Posted => Self::Posted,
        }
    }
}
