//! Ledger domain types for voucher construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::account::PostingPurpose;

/// Entry type: either Debit or Credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

/// How a leg names its account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRef {
    /// Account id, which must belong to the posting company.
    Id(i64),
    /// Exact account code.
    Code(String),
    /// Posting purpose, resolved through the company's mapping.
    Purpose(PostingPurpose),
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "account #{id}"),
            Self::Code(code) => write!(f, "account code {code}"),
            Self::Purpose(purpose) => write!(f, "purpose {purpose}"),
        }
    }
}

/// One debit-or-credit leg as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherLeg {
    /// The account to post to.
    pub account: AccountRef,
    /// Debit amount (zero for a credit leg).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero for a debit leg).
    #[serde(default)]
    pub credit: Decimal,
    /// Line description.
    #[serde(default)]
    pub description: Option<String>,
    /// Number of the source document this leg came from.
    #[serde(default)]
    pub reference_no: Option<String>,
}

impl VoucherLeg {
    /// Creates a debit leg.
    #[must_use]
    pub fn debit(account: AccountRef, amount: Decimal) -> Self {
        Self {
            account,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
            reference_no: None,
        }
    }

    /// Creates a credit leg.
    #[must_use]
    pub fn credit(account: AccountRef, amount: Decimal) -> Self {
        Self {
            account,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
            reference_no: None,
        }
    }

    /// Sets the line description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the source document reference.
    #[must_use]
    pub fn with_reference(mut self, reference_no: impl Into<String>) -> Self {
        self.reference_no = Some(reference_no.into());
        self
    }
}

/// A leg after validation: one side, positive, rounded to the minor unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLeg {
    /// The account reference, still unresolved.
    pub account: AccountRef,
    /// Which side the amount sits on.
    pub entry_type: EntryType,
    /// Positive amount at minor-unit precision.
    pub amount: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Source document reference.
    pub reference_no: Option<String>,
}

impl NormalizedLeg {
    /// Debit amount (zero for credits).
    #[must_use]
    pub fn debit(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => Decimal::ZERO,
        }
    }

    /// Credit amount (zero for debits).
    #[must_use]
    pub fn credit(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => Decimal::ZERO,
            EntryType::Credit => self.amount,
        }
    }
}

/// A voucher line ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingLine {
    /// 1-based position, following leg order.
    pub line_no: i32,
    /// Resolved account id.
    pub account_id: i64,
    /// Debit amount (zero for a credit line).
    pub debit: Decimal,
    /// Credit amount (zero for a debit line).
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
    /// Source document reference.
    pub reference_no: Option<String>,
}

/// Voucher totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoucherTotals {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl VoucherTotals {
    /// Creates new totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Voucher header status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherStatus {
    /// Saved but not yet in the ledger.
    Draft,
    /// In the ledger; immutable.
    Posted,
}

impl VoucherStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Posted => "POSTED",
        }
    }
}

impl fmt::Display for VoucherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
