//! Double-entry voucher construction.
//!
//! This module implements the pure half of posting:
//! - Voucher legs and account references
//! - Minor-unit normalisation of leg amounts
//! - Balance validation (never auto-balanced)
//! - Resolution of legs into numbered voucher lines
//! - Error types for posting

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    AccountRef, EntryType, NormalizedLeg, PostingLine, VoucherLeg, VoucherStatus, VoucherTotals,
};
