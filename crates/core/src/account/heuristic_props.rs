//! Property-based tests for the heuristic account ranking.

use proptest::prelude::*;

use super::heuristic::{AccountHint, is_eligible, pick_best_account};
use super::types::{AccountCandidate, AccountNature, PostingPurpose};

fn arb_nature() -> impl Strategy<Value = AccountNature> {
    prop_oneof![
        Just(AccountNature::Asset),
        Just(AccountNature::Liability),
        Just(AccountNature::Equity),
        Just(AccountNature::Income),
        Just(AccountNature::Expense),
    ]
}

fn arb_purpose() -> impl Strategy<Value = PostingPurpose> {
    proptest::sample::select(PostingPurpose::ALL.to_vec())
}

fn arb_name() -> impl Strategy<Value = String> {
    proptest::sample::select(vec![
        "Cash in Hand",
        "Bank Current Account",
        "Inventory",
        "Stock Adjustment",
        "GRN Clearing",
        "Sales Revenue",
        "Cost of Sales",
        "Input Tax",
        "VAT Payable",
        "Output Tax",
        "Sundry",
    ])
    .prop_map(str::to_string)
}

fn arb_candidate() -> impl Strategy<Value = AccountCandidate> {
    (
        1i64..10_000,
        1000u32..3000,
        arb_name(),
        arb_nature(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(id, code, name, nature, is_active, is_postable)| AccountCandidate {
            id,
            code: code.to_string(),
            name,
            nature,
            is_active,
            is_postable,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Never returns an inactive or non-postable account.
    #[test]
    fn prop_only_eligible_accounts_returned(
        candidates in prop::collection::vec(arb_candidate(), 0..20),
        purpose in arb_purpose(),
    ) {
        let hint = AccountHint::for_purpose(purpose);
        if let Some(picked) = pick_best_account(&candidates, &hint) {
            prop_assert!(is_eligible(picked));
        }
    }

    /// The pick has the best rank among all candidates.
    #[test]
    fn prop_pick_has_minimal_rank(
        candidates in prop::collection::vec(arb_candidate(), 1..20),
        purpose in arb_purpose(),
    ) {
        let hint = AccountHint::for_purpose(purpose);
        let best = candidates.iter().filter_map(|c| hint.rank(c)).min();
        let picked = pick_best_account(&candidates, &hint).and_then(|c| hint.rank(c));
        prop_assert_eq!(picked, best);
    }
}
