//! Status write-back to the submitting module's document table.

use async_trait::async_trait;
use ledgerflow_core::workflow::{DocumentStatus, WorkflowError};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseTransaction, Statement};
use tracing::debug;

use super::workflow_db_err;

/// Writes a routing outcome back onto the source document.
///
/// Runs inside the routing transaction, so a failed write-back rolls back
/// the instance, task, and any posted voucher with it.
#[async_trait]
pub trait DocumentStatusWriter: Send + Sync {
    /// Sets the document's status.
    async fn set_status(
        &self,
        txn: &DatabaseTransaction,
        company_id: i64,
        document_id: i64,
        status: DocumentStatus,
    ) -> Result<(), WorkflowError>;
}

/// Tables owned by the ledger and workflow engine; never a write-back target.
const ENGINE_TABLES: &[&str] = &[
    "account_groups",
    "accounts",
    "companies",
    "document_workflow_instances",
    "fiscal_years",
    "notifications",
    "posting_account_mappings",
    "seaql_migrations",
    "users",
    "voucher_lines",
    "voucher_types",
    "vouchers",
    "workflow_definitions",
    "workflow_logs",
    "workflow_step_approvers",
    "workflow_steps",
    "workflow_tasks",
];

/// A module table with `id`, `company_id`, and `status` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTable {
    name: String,
}

impl DocumentTable {
    /// Validates a table name before it is spliced into SQL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocumentTable` unless the name is a plain lowercase
    /// identifier of at most 63 bytes that is not one of the engine's own
    /// tables.
    pub fn new(name: impl Into<String>) -> Result<Self, WorkflowError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.len() <= 63
            && name.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            && !ENGINE_TABLES.contains(&name.as_str());
        if valid {
            Ok(Self { name })
        } else {
            Err(WorkflowError::InvalidDocumentTable(name))
        }
    }

    /// Like [`DocumentTable::new`], but the name must also be on `allow_list`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocumentTable` if the name is invalid or not listed.
    pub fn allowed(name: impl Into<String>, allow_list: &[String]) -> Result<Self, WorkflowError> {
        let table = Self::new(name)?;
        if allow_list.iter().any(|listed| *listed == table.name) {
            Ok(table)
        } else {
            Err(WorkflowError::InvalidDocumentTable(table.name))
        }
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn update_statement(&self, company_id: i64, document_id: i64, status: DocumentStatus) -> Statement {
        Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            format!(
                r#"UPDATE "{}" SET status = $1 WHERE id = $2 AND company_id = $3"#,
                self.name
            ),
            [status.as_str().into(), document_id.into(), company_id.into()],
        )
    }
}

#[async_trait]
impl DocumentStatusWriter for DocumentTable {
    async fn set_status(
        &self,
        txn: &DatabaseTransaction,
        company_id: i64,
        document_id: i64,
        status: DocumentStatus,
    ) -> Result<(), WorkflowError> {
        let result = txn
            .execute_raw(self.update_statement(company_id, document_id, status))
            .await
            .map_err(workflow_db_err)?;

        if result.rows_affected() == 0 {
            return Err(WorkflowError::DocumentNotFound {
                table: self.name.clone(),
                id: document_id,
            });
        }

        debug!(table = %self.name, document_id, status = %status, "Document status updated");
        Ok(())
    }
}

/// Writer for callers that track document status themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct UntrackedDocument;

#[async_trait]
impl DocumentStatusWriter for UntrackedDocument {
    async fn set_status(
        &self,
        _txn: &DatabaseTransaction,
        _company_id: i64,
        _document_id: i64,
        _status: DocumentStatus,
    ) -> Result<(), WorkflowError> {
        Ok(())
    }
}
