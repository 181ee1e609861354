//! Workflow error types for document submission.

use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that can occur while submitting a document.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Neither a document type nor a document route was given.
    #[error("Either document_type or document_route is required")]
    MissingDocumentKey,

    /// Active workflow has no step 1.
    #[error("Workflow {0} has no steps configured")]
    NoWorkflowSteps(i64),

    /// Step 1 exists but names no approver.
    #[error("First step of workflow {0} has no approver")]
    FirstStepWithoutApprover(i64),

    /// Workflow definition does not exist for this company.
    #[error("Workflow {0} not found")]
    WorkflowNotFound(i64),

    /// Document table name is not a plain SQL identifier.
    #[error("Invalid document table name: {0}")]
    InvalidDocumentTable(String),

    /// Status write-back matched no document row.
    #[error("Document {id} not found in {table}")]
    DocumentNotFound {
        /// Table that was updated.
        table: String,
        /// Document id.
        id: i64,
    },

    /// Auto-approve posting failed.
    #[error(transparent)]
    Posting(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingDocumentKey | Self::InvalidDocumentTable(_) => 400,

            Self::WorkflowNotFound(_) | Self::DocumentNotFound { .. } => 404,

            Self::NoWorkflowSteps(_) | Self::FirstStepWithoutApprover(_) => 422,

            Self::Posting(e) => e.http_status_code(),

            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDocumentKey => "MISSING_DOCUMENT_KEY",
            Self::NoWorkflowSteps(_) => "NO_WORKFLOW_STEPS",
            Self::FirstStepWithoutApprover(_) => "FIRST_STEP_WITHOUT_APPROVER",
            Self::WorkflowNotFound(_) => "WORKFLOW_NOT_FOUND",
            Self::InvalidDocumentTable(_) => "INVALID_DOCUMENT_TABLE",
            Self::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::Posting(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true for misconfiguration that an administrator must fix.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoWorkflowSteps(_)
                | Self::FirstStepWithoutApprover(_)
                | Self::Posting(LedgerError::AccountNotConfigured(_))
        )
    }
}
