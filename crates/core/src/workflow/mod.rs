//! Approval routing for submitted business documents.
//!
//! This module decides, for any document type, whether a submission goes to
//! a human approver or falls through to its workflow's default behavior.
//!
//! # Modules
//!
//! - `types` - Document states, approval states, routing decisions
//! - `error` - Workflow-specific error types
//! - `selector` - Workflow definition selection by route/type and amount
//! - `assignee` - First-step assignee resolution

pub mod assignee;
pub mod error;
pub mod selector;
pub mod types;

#[cfg(test)]
mod selector_props;

pub use assignee::{first_step_approver, resolve_assignee};
pub use error::WorkflowError;
pub use selector::{WorkflowRule, WorkflowSelector};
pub use types::{ApprovalState, DefaultBehavior, DocumentStatus, LogAction, RoutingDecision};
