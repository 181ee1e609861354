//! Fiscal resolution errors.

use thiserror::Error;

/// Errors that can occur while resolving a fiscal year.
#[derive(Debug, Error)]
pub enum FiscalError {
    /// The date is missing, malformed, or outside the representable range.
    #[error("Cannot resolve a fiscal year: {0}")]
    Unresolvable(String),

    /// Fiscal year referenced by id does not exist for this company.
    #[error("Fiscal year {0} not found")]
    YearNotFound(i64),

    /// Every candidate code for a new year was already taken.
    #[error("Could not allocate a fiscal year code starting at {base} after {attempts} attempts")]
    CodeExhausted {
        /// The unsuffixed code.
        base: String,
        /// Attempts made.
        attempts: u32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl FiscalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unresolvable(_) => "FISCAL_YEAR_UNRESOLVABLE",
            Self::YearNotFound(_) => "FISCAL_YEAR_NOT_FOUND",
            Self::CodeExhausted { .. } => "FISCAL_YEAR_CODE_EXHAUSTED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Unresolvable(_) => 400,
            Self::YearNotFound(_) => 404,
            Self::CodeExhausted { .. } => 409,
            Self::Database(_) => 500,
        }
    }
}
