//! Property-based tests for voucher validation.
//!
//! Every voucher that passes validation balances exactly; every voucher that
//! does not balance is rejected before account lookup.

use ledgerflow_shared::types::CurrencyScale;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{AccountRef, PostingLine, VoucherLeg, VoucherTotals};

/// Strategy for positive amounts between 0.01 and 1,000,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Balanced legs: debits split arbitrarily, one credit for the total.
fn arb_balanced_legs() -> impl Strategy<Value = Vec<VoucherLeg>> {
    prop::collection::vec(arb_amount(), 1..8).prop_map(|debits| {
        let total: Decimal = debits.iter().copied().sum();
        let mut legs: Vec<VoucherLeg> = debits
            .into_iter()
            .enumerate()
            .map(|(i, amount)| VoucherLeg::debit(AccountRef::Id(i64::try_from(i).unwrap_or(0) + 1), amount))
            .collect();
        legs.push(VoucherLeg::credit(AccountRef::Id(1000), total));
        legs
    })
}

fn lookup(account: &AccountRef) -> Result<i64, LedgerError> {
    match account {
        AccountRef::Id(id) => Ok(*id),
        other => Err(LedgerError::AccountNotFound(other.to_string())),
    }
}

fn resolved(legs: &[VoucherLeg]) -> (Vec<PostingLine>, VoucherTotals) {
    let (normalized, totals) = LedgerService::validate_legs(legs, CurrencyScale::CENTS).unwrap();
    (LedgerService::resolve_lines(normalized, lookup).unwrap(), totals)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Accepted vouchers balance exactly and line totals match the header.
    #[test]
    fn prop_accepted_vouchers_balance(legs in arb_balanced_legs()) {
        let (lines, totals) = resolved(&legs);
        let debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = lines.iter().map(|l| l.credit).sum();
        prop_assert_eq!(debit, credit);
        prop_assert_eq!(debit, totals.total_debit);
        prop_assert_eq!(credit, totals.total_credit);
    }

    /// Every line carries exactly one non-zero side.
    #[test]
    fn prop_lines_are_one_sided(legs in arb_balanced_legs()) {
        let (lines, _) = resolved(&legs);
        for line in &lines {
            prop_assert!(line.debit.is_zero() != line.credit.is_zero());
        }
    }

    /// Line numbers run 1..=n in leg order.
    #[test]
    fn prop_line_numbers_follow_leg_order(legs in arb_balanced_legs()) {
        let n = legs.len();
        let (lines, _) = resolved(&legs);
        let numbers: Vec<i32> = lines.iter().map(|l| l.line_no).collect();
        let expected: Vec<i32> = (1..).take(n).collect();
        prop_assert_eq!(numbers, expected);
    }

    /// Any imbalance of at least one minor unit is rejected.
    #[test]
    fn prop_imbalance_rejected(
        mut legs in arb_balanced_legs(),
        skew in arb_amount(),
    ) {
        if let Some(last) = legs.last_mut() {
            last.credit += skew;
        }
        let result = LedgerService::validate_legs(&legs, CurrencyScale::CENTS);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedVoucher { .. })),
            "imbalance should be rejected, got: {:?}",
            result
        );
    }

    /// Negative amounts are rejected wherever they appear.
    #[test]
    fn prop_negative_rejected(
        amount in arb_amount(),
        position in 0usize..2,
    ) {
        let mut legs = vec![
            VoucherLeg::debit(AccountRef::Id(1), amount),
            VoucherLeg::credit(AccountRef::Id(2), amount),
        ];
        legs[position].debit = -amount;
        legs[position].credit = Decimal::ZERO;
        let result = LedgerService::validate_legs(&legs, CurrencyScale::CENTS);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidLegAmount { .. })),
            "negative amount should be rejected, got: {:?}",
            result
        );
    }
}
