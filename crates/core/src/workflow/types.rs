//! Workflow domain types for document routing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a source document as seen by the engine.
///
/// The valid transitions driven here are:
/// - Draft → PendingApproval (active workflow matched)
/// - Draft → Approved (no active workflow, default AUTO_APPROVE)
/// - Draft → Posted (auto-approved and posted in the same transition)
/// - Draft → Submitted (no active workflow, no auto-approve)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Being edited by its author.
    Draft,
    /// Waiting on the first-step assignee.
    PendingApproval,
    /// Approved without human review.
    Approved,
    /// Submitted with no approval required.
    Submitted,
    /// Approved and posted to the ledger.
    Posted,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Approved => "APPROVED",
            Self::Submitted => "SUBMITTED",
            Self::Posted => "POSTED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a workflow does when it is not active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefaultBehavior {
    /// Approve immediately.
    AutoApprove,
    /// Mark submitted and wait for an external actor.
    Submit,
}

impl DefaultBehavior {
    /// Reads the stored column; anything other than `AUTO_APPROVE` means submit.
    #[must_use]
    pub fn from_column(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("AUTO_APPROVE") => Self::AutoApprove,
            _ => Self::Submit,
        }
    }

    /// Returns the string representation of the behavior.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AutoApprove => "AUTO_APPROVE",
            Self::Submit => "SUBMIT",
        }
    }
}

/// State of a workflow instance and of its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalState {
    /// Waiting on the assignee.
    Pending,
    /// Assignee approved.
    Approved,
    /// Assignee rejected.
    Rejected,
}

impl ApprovalState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit log action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogAction {
    /// Document submitted into a workflow.
    Submit,
    /// Step approved.
    Approve,
    /// Step rejected.
    Reject,
}

impl LogAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "SUBMIT",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
        }
    }
}

/// Outcome of workflow selection for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// An active workflow matched; route to its first step.
    Route {
        /// The matched workflow definition.
        workflow_id: i64,
    },
    /// No active workflow; approve without review.
    AutoApprove,
    /// No active workflow; mark submitted.
    Submit,
}

impl RoutingDecision {
    /// Document status after the submit transition.
    ///
    /// `posted` is true when an auto-approved document was also posted.
    #[must_use]
    pub const fn document_status(&self, posted: bool) -> DocumentStatus {
        match self {
            Self::Route { .. } => DocumentStatus::PendingApproval,
            Self::AutoApprove if posted => DocumentStatus::Posted,
            Self::AutoApprove => DocumentStatus::Approved,
            Self::Submit => DocumentStatus::Submitted,
        }
    }
}
