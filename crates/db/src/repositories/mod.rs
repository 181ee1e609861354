//! Repository layer for database operations.
//!
//! Each component of the posting engine exposes `*_in` functions that run
//! on a caller-supplied connection or transaction, so the router and the
//! poster can compose them inside one unit of work.

pub mod account;
pub mod document;
pub mod fiscal;
pub mod ledger;
pub mod notification;
pub mod voucher_type;
pub mod workflow;

pub use account::AccountRepository;
pub use document::{DocumentStatusWriter, DocumentTable, UntrackedDocument};
pub use fiscal::FiscalRepository;
pub use ledger::{LedgerPoster, PostVoucherInput, PostedVoucher};
pub use notification::NotificationRepository;
pub use voucher_type::{IssuedNumber, VoucherTypeRepository};
pub use workflow::{ApprovalRouter, SubmitDocumentInput, SubmitOutcome, VoucherDraft};

use ledgerflow_core::fiscal::FiscalError;
use ledgerflow_core::ledger::LedgerError;
use ledgerflow_core::workflow::WorkflowError;
use sea_orm::{DbErr, SqlErr};

/// Returns true when the error is a unique-key collision.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Returns true for deadlocks, serialization failures, and lock timeouts.
pub(crate) fn is_lock_contention(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("deadlock detected")
        || msg.contains("could not serialize")
        || msg.contains("lock timeout")
}

pub(crate) fn ledger_db_err(err: DbErr) -> LedgerError {
    if is_lock_contention(&err) {
        LedgerError::LockContention(err.to_string())
    } else {
        LedgerError::Database(err.to_string())
    }
}

pub(crate) fn fiscal_db_err(err: DbErr) -> FiscalError {
    FiscalError::Database(err.to_string())
}

pub(crate) fn workflow_db_err(err: DbErr) -> WorkflowError {
    if is_lock_contention(&err) {
        WorkflowError::Posting(LedgerError::LockContention(err.to_string()))
    } else {
        WorkflowError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadlock_is_retryable() {
        let err = ledger_db_err(DbErr::Custom("deadlock detected".into()));
        assert!(err.is_retryable());

        let err = workflow_db_err(DbErr::Custom("could not serialize access".into()));
        assert_eq!(err.http_status_code(), 409);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = ledger_db_err(DbErr::Custom("connection reset".into()));
        assert!(!err.is_retryable());
        assert_eq!(err.http_status_code(), 500);

        assert!(!is_unique_violation(&DbErr::Custom("boom".into())));
    }
}
