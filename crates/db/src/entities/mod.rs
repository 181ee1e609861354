//! `SeaORM` entities for the posting engine schema.

pub mod prelude;

pub mod account_groups;
pub mod accounts;
pub mod companies;
pub mod document_workflow_instances;
pub mod fiscal_years;
pub mod notifications;
pub mod posting_account_mappings;
pub mod sea_orm_active_enums;
pub mod users;
pub mod voucher_lines;
pub mod voucher_types;
pub mod vouchers;
pub mod workflow_definitions;
pub mod workflow_logs;
pub mod workflow_step_approvers;
pub mod workflow_steps;
pub mod workflow_tasks;
