//! Ledger account selection.
//!
//! Explicit purpose mappings are the primary way to pick a posting account;
//! the heuristic ranking here is the fallback for companies whose chart of
//! accounts predates the mapping table.

pub mod heuristic;
pub mod types;

#[cfg(test)]
mod heuristic_props;

pub use heuristic::{AccountHint, is_eligible, pick_best_account};
pub use types::{AccountCandidate, AccountNature, PostingPurpose};
