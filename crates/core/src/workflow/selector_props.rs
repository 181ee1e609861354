//! Property-based tests for workflow selection and assignee resolution.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::assignee::resolve_assignee;
use super::selector::{WorkflowRule, WorkflowSelector};
use super::types::{DefaultBehavior, RoutingDecision};

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_behavior() -> impl Strategy<Value = DefaultBehavior> {
    prop_oneof![Just(DefaultBehavior::AutoApprove), Just(DefaultBehavior::Submit)]
}

fn arb_rule() -> impl Strategy<Value = WorkflowRule> {
    (
        1i64..1000,
        any::<bool>(),
        proptest::option::of(arb_amount()),
        proptest::option::of(arb_amount()),
        arb_behavior(),
    )
        .prop_map(|(id, is_active, min_amount, max_amount, default_behavior)| WorkflowRule {
            id,
            is_active,
            min_amount,
            max_amount,
            default_behavior,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A definition bounded to [100, 500] never routes amounts outside it.
    #[test]
    fn prop_out_of_range_amount_skipped(
        below in (0i64..10_000).prop_map(|c| Decimal::new(c, 2)),
        above in (50_001i64..10_000_000).prop_map(|c| Decimal::new(c, 2)),
    ) {
        let bounded = vec![WorkflowRule {
            id: 1,
            is_active: true,
            min_amount: Some(Decimal::new(100, 0)),
            max_amount: Some(Decimal::new(500, 0)),
            default_behavior: DefaultBehavior::Submit,
        }];
        prop_assert_eq!(WorkflowSelector::decide(&[], &bounded, Some(below)), RoutingDecision::Submit);
        prop_assert_eq!(WorkflowSelector::decide(&[], &bounded, Some(above)), RoutingDecision::Submit);
    }

    /// Inactive definitions are never chosen for routing.
    #[test]
    fn prop_inactive_never_routes(
        routes in prop::collection::vec(arb_rule(), 0..6),
        types in prop::collection::vec(arb_rule(), 0..6),
        amount in proptest::option::of(arb_amount()),
    ) {
        if let Some(chosen) = WorkflowSelector::select(&routes, &types, amount) {
            prop_assert!(chosen.is_active);
            prop_assert!(chosen.matches_amount(amount));
        }
    }

    /// With nothing active, the first type candidate's default decides.
    #[test]
    fn prop_fallback_reads_first_type_candidate(
        mut types in prop::collection::vec(arb_rule(), 1..6),
        amount in proptest::option::of(arb_amount()),
    ) {
        for r in &mut types {
            r.is_active = false;
        }
        let first = types.iter().min_by_key(|r| r.id).map(|r| r.default_behavior);
        let expected = match first {
            Some(DefaultBehavior::AutoApprove) => RoutingDecision::AutoApprove,
            _ => RoutingDecision::Submit,
        };
        prop_assert_eq!(WorkflowSelector::decide(&[], &types, amount), expected);
    }

    /// The resolved assignee is the target, an allow-listed user, or the default.
    #[test]
    fn prop_assignee_is_permitted(
        target in proptest::option::of(1i64..50),
        allow_list in prop::collection::vec(1i64..50, 0..5),
        default_approver in 1i64..50,
    ) {
        let assignee = resolve_assignee(target, &allow_list, default_approver);
        if allow_list.is_empty() {
            prop_assert_eq!(assignee, default_approver);
        } else {
            prop_assert!(allow_list.contains(&assignee));
        }
        if let Some(t) = target && allow_list.contains(&t) {
            prop_assert_eq!(assignee, t);
        }
    }
}
