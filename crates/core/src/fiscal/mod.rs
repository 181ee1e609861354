//! Fiscal year windows and codes.

pub mod error;
pub mod window;

#[cfg(test)]
mod window_props;

pub use error::FiscalError;
pub use window::{FiscalWindow, MAX_CODE_ATTEMPTS, clamp_start_month, parse_posting_date, suffixed_code};
