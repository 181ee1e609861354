//! First-step assignee resolution.

use super::error::WorkflowError;

/// Chooses who receives the first approval task.
///
/// A caller-supplied target wins only if it is on the step's allow-list;
/// otherwise the first allow-listed approver, otherwise the step default.
#[must_use]
pub fn resolve_assignee(target: Option<i64>, allow_list: &[i64], default_approver: i64) -> i64 {
    match target {
        Some(user_id) if allow_list.contains(&user_id) => user_id,
        _ => allow_list.first().copied().unwrap_or(default_approver),
    }
}

/// Validates that step 1 exists and names an approver.
///
/// `first_step` is `None` when the workflow has no step 1, and
/// `Some(None)` when the step has no approver.
///
/// # Errors
///
/// Returns a configuration error; misconfigured workflows are never repaired.
pub fn first_step_approver(
    workflow_id: i64,
    first_step: Option<Option<i64>>,
) -> Result<i64, WorkflowError> {
    match first_step {
        None => Err(WorkflowError::NoWorkflowSteps(workflow_id)),
        Some(None) => Err(WorkflowError::FirstStepWithoutApprover(workflow_id)),
        Some(Some(approver)) => Ok(approver),
    }
}
