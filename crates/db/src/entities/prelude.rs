//! Entity re-exports.

pub use super::account_groups::Entity as AccountGroups;
pub use super::accounts::Entity as Accounts;
pub use super::companies::Entity as Companies;
pub use super::document_workflow_instances::Entity as DocumentWorkflowInstances;
pub use super::fiscal_years::Entity as FiscalYears;
pub use super::notifications::Entity as Notifications;
pub use super::posting_account_mappings::Entity as PostingAccountMappings;
pub use super::users::Entity as Users;
pub use super::voucher_lines::Entity as VoucherLines;
pub use super::voucher_types::Entity as VoucherTypes;
pub use super::vouchers::Entity as Vouchers;
pub use super::workflow_definitions::Entity as WorkflowDefinitions;
pub use super::workflow_logs::Entity as WorkflowLogs;
pub use super::workflow_step_approvers::Entity as WorkflowStepApprovers;
pub use super::workflow_steps::Entity as WorkflowSteps;
pub use super::workflow_tasks::Entity as WorkflowTasks;
