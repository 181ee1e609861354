//! Ledger error types for posting.
//!
//! Validation errors are raised before any write. Configuration, fiscal
//! and not-found errors abort the enclosing transaction.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::fiscal::FiscalError;

/// Errors that can occur while posting a voucher.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Voucher has no legs.
    #[error("Voucher must have at least one leg")]
    NoLegs,

    /// A leg amount is zero, negative, or on both sides.
    #[error("Leg {line} has an invalid amount: {reason}")]
    InvalidLegAmount {
        /// 1-based leg position.
        line: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Debits and credits differ at minor-unit precision.
    #[error("Voucher is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedVoucher {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Configuration Errors ==========
    /// No account could be resolved for a required leg.
    #[error("No ledger account configured for {0}")]
    AccountNotConfigured(String),

    /// Voucher type exists but is switched off.
    #[error("Voucher type {0} is inactive")]
    VoucherTypeInactive(String),

    // ========== Not Found Errors ==========
    /// Account reference does not exist for this company.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Fiscal year does not exist for this company.
    #[error("Fiscal year not found: {0}")]
    FiscalYearNotFound(i64),

    /// Voucher type does not exist for this company.
    #[error("Voucher type not found: {0}")]
    VoucherTypeNotFound(String),

    /// The voucher's fiscal year could not be resolved from its date.
    #[error(transparent)]
    Fiscal(#[from] FiscalError),

    // ========== Concurrency Errors ==========
    /// Lock wait ended in a deadlock or serialization failure.
    #[error("Concurrent posting conflict, please retry: {0}")]
    LockContention(String),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLegs => "NO_LEGS",
            Self::InvalidLegAmount { .. } => "INVALID_LEG_AMOUNT",
            Self::UnbalancedVoucher { .. } => "UNBALANCED_VOUCHER",
            Self::AccountNotConfigured(_) => "ACCOUNT_NOT_CONFIGURED",
            Self::VoucherTypeInactive(_) => "VOUCHER_TYPE_INACTIVE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::FiscalYearNotFound(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::VoucherTypeNotFound(_) => "VOUCHER_TYPE_NOT_FOUND",
            Self::Fiscal(e) => e.error_code(),
            Self::LockContention(_) => "LOCK_CONTENTION",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NoLegs | Self::InvalidLegAmount { .. } | Self::UnbalancedVoucher { .. } => 400,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::FiscalYearNotFound(_)
            | Self::VoucherTypeNotFound(_) => 404,

            // 409 Conflict - concurrency errors
            Self::LockContention(_) => 409,

            // 422 Unprocessable - configuration errors
            Self::AccountNotConfigured(_) | Self::VoucherTypeInactive(_) => 422,

            Self::Fiscal(e) => e.http_status_code(),

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }

    /// Returns true if the caller may retry the whole operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LockContention(_))
    }

    /// Returns true for errors raised before anything touched the database.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoLegs | Self::InvalidLegAmount { .. } | Self::UnbalancedVoucher { .. }
        )
    }
}
