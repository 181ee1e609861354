//! Account domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of a ledger account, carried by its account group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountNature {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Revenue and other income.
    Income,
    /// Costs and expenses.
    Expense,
}

impl AccountNature {
    /// Returns the string representation of the nature.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a posting leg is for, independent of the chart of accounts.
///
/// Companies map each purpose to one of their accounts in
/// `posting_account_mappings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingPurpose {
    /// Stock on hand.
    Inventory,
    /// Recoverable input VAT.
    VatInput,
    /// Goods received, not yet invoiced.
    GrnClearing,
    /// Sales revenue.
    SalesRevenue,
    /// Cost of goods sold.
    CostOfSales,
    /// Stock write-ups and write-downs.
    StockAdjustment,
    /// Cash in hand.
    Cash,
    /// VAT payable on sales.
    VatOutput,
}

impl PostingPurpose {
    #[cfg(test)]
    pub(crate) const ALL: [Self; 8] = [
        Self::Inventory,
        Self::VatInput,
        Self::GrnClearing,
        Self::SalesRevenue,
        Self::CostOfSales,
        Self::StockAdjustment,
        Self::Cash,
        Self::VatOutput,
    ];

    /// Returns the string representation of the purpose.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "INVENTORY",
            Self::VatInput => "VAT_INPUT",
            Self::GrnClearing => "GRN_CLEARING",
            Self::SalesRevenue => "SALES_REVENUE",
            Self::CostOfSales => "COST_OF_SALES",
            Self::StockAdjustment => "STOCK_ADJUSTMENT",
            Self::Cash => "CASH",
            Self::VatOutput => "VAT_OUTPUT",
        }
    }
}

impl fmt::Display for PostingPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account as seen by the heuristic resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCandidate {
    /// Account id.
    pub id: i64,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Nature of the owning group.
    pub nature: AccountNature,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the account is a leaf that accepts postings.
    pub is_postable: bool,
}
