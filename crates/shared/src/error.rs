//! Application-wide error types.

use thiserror::Error;

/// Errors raised by the HTTP layer itself rather than a domain service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed a check no domain service covers.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
