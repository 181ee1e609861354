//! Core business logic for Ledgerflow.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Everything here is deterministic and testable without a running PostgreSQL.
//!
//! # Modules
//!
//! - `workflow` - Workflow selection, assignee resolution, document states
//! - `ledger` - Voucher legs, minor-unit normalisation, balance checks
//! - `fiscal` - Fiscal-year windows and year codes
//! - `sequence` - Voucher numbering and the well-known voucher types
//! - `account` - Posting purposes and the heuristic account ranking

pub mod account;
pub mod fiscal;
pub mod ledger;
pub mod sequence;
pub mod workflow;
