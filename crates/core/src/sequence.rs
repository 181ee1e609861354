//! Voucher numbering.
//!
//! The counter itself lives on the `voucher_types` row and is advanced under
//! a row lock by the database layer; this module only formats numbers and
//! describes the voucher types created on demand.

use std::fmt;

/// Formats a voucher number as `<prefix>-<number>`.
///
/// A blank prefix yields the bare number.
#[must_use]
pub fn format_voucher_no(prefix: &str, number: i64) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        number.to_string()
    } else {
        format!("{prefix}-{number}")
    }
}

/// Voucher types every company gets lazily on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownVoucherType {
    /// General journal.
    Journal,
    /// Sales postings.
    Sales,
    /// Cash and bank receipts.
    Receipt,
}

impl WellKnownVoucherType {
    /// Type code, also used as the number prefix.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Journal => "JV",
            Self::Sales => "SV",
            Self::Receipt => "RV",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Journal => "Journal Voucher",
            Self::Sales => "Sales Voucher",
            Self::Receipt => "Receipt Voucher",
        }
    }

    /// Voucher category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Journal => "JOURNAL",
            Self::Sales => "SALES",
            Self::Receipt => "RECEIPT",
        }
    }
}

impl fmt::Display for WellKnownVoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
