//! Workflow definition selection.
//!
//! Candidates come in two lists: definitions matched on the exact document
//! route and definitions matched on the document type (any accepted
//! spelling). Route matches outrank type matches. Within a list the lowest
//! id wins, so insertion order is priority.
//!
//! When nothing active matches, only the *type* list is consulted for a
//! default behavior, and its lowest-id entry is used whether active or not.
//! Existing workflow configurations depend on this precedence.

use rust_decimal::Decimal;

use super::types::{DefaultBehavior, RoutingDecision};

/// A workflow definition as seen by the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRule {
    /// Definition id (ascending = priority).
    pub id: i64,
    /// Whether the definition routes documents.
    pub is_active: bool,
    /// Inclusive lower bound; `None` = unbounded.
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound; `None` = unbounded.
    pub max_amount: Option<Decimal>,
    /// Behavior consulted when no active definition matches.
    pub default_behavior: DefaultBehavior,
}

impl WorkflowRule {
    /// Returns true if the amount falls in `[min_amount, max_amount]`.
    ///
    /// A document without an amount matches every range.
    #[must_use]
    pub fn matches_amount(&self, amount: Option<Decimal>) -> bool {
        let Some(amount) = amount else {
            return true;
        };
        let above_min = self.min_amount.is_none_or(|min| amount >= min);
        let below_max = self.max_amount.is_none_or(|max| amount <= max);
        above_min && below_max
    }

    /// Returns true if this definition would route the document.
    #[must_use]
    pub fn is_eligible(&self, amount: Option<Decimal>) -> bool {
        self.is_active && self.matches_amount(amount)
    }
}

/// Stateless workflow selector.
pub struct WorkflowSelector;

impl WorkflowSelector {
    /// Lowest-id eligible definition in one candidate list.
    #[must_use]
    pub fn first_eligible(candidates: &[WorkflowRule], amount: Option<Decimal>) -> Option<&WorkflowRule> {
        candidates
            .iter()
            .filter(|r| r.is_eligible(amount))
            .min_by_key(|r| r.id)
    }

    /// Picks the active definition for a submission, route matches first.
    #[must_use]
    pub fn select<'a>(
        route_candidates: &'a [WorkflowRule],
        type_candidates: &'a [WorkflowRule],
        amount: Option<Decimal>,
    ) -> Option<&'a WorkflowRule> {
        Self::first_eligible(route_candidates, amount)
            .or_else(|| Self::first_eligible(type_candidates, amount))
    }

    /// Behavior when nothing active matched: the lowest-id type candidate's default.
    #[must_use]
    pub fn fallback_behavior(type_candidates: &[WorkflowRule]) -> DefaultBehavior {
        type_candidates
            .iter()
            .min_by_key(|r| r.id)
            .map_or(DefaultBehavior::Submit, |r| r.default_behavior)
    }

    /// Full routing decision for a submission.
    #[must_use]
    pub fn decide(
        route_candidates: &[WorkflowRule],
        type_candidates: &[WorkflowRule],
        amount: Option<Decimal>,
    ) -> RoutingDecision {
        if let Some(rule) = Self::select(route_candidates, type_candidates, amount) {
            return RoutingDecision::Route {
                workflow_id: rule.id,
            };
        }
        match Self::fallback_behavior(type_candidates) {
            DefaultBehavior::AutoApprove => RoutingDecision::AutoApprove,
            DefaultBehavior::Submit => RoutingDecision::Submit,
        }
    }
}
