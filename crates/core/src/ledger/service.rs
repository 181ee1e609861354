//! Ledger service for voucher validation and line resolution.
//!
//! Posting runs in two pure phases around the database lookups:
//! [`LedgerService::validate_legs`] rejects bad input before anything is
//! read, and [`LedgerService::resolve_lines`] turns legs into numbered lines
//! once account references have been looked up.

use ledgerflow_shared::types::CurrencyScale;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{AccountRef, EntryType, NormalizedLeg, PostingLine, VoucherLeg, VoucherTotals};

/// Largest amount a `NUMERIC(19,4)` column holds: 999,999,999,999,999.9999.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, 4);

/// Ledger service for voucher validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates legs and normalises their amounts to the minor unit.
    ///
    /// 1. The voucher has at least one leg
    /// 2. No leg carries a negative amount
    /// 3. Each leg carries exactly one non-zero side after rounding
    /// 4. Amounts and totals fit the ledger's `NUMERIC(19,4)` columns
    /// 5. Σ debit == Σ credit after rounding
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn validate_legs(
        legs: &[VoucherLeg],
        scale: CurrencyScale,
    ) -> Result<(Vec<NormalizedLeg>, VoucherTotals), LedgerError> {
        if legs.is_empty() {
            return Err(LedgerError::NoLegs);
        }

        let mut normalized = Vec::with_capacity(legs.len());
        for (idx, leg) in legs.iter().enumerate() {
            normalized.push(Self::normalize_leg(idx + 1, leg, scale)?);
        }

        let totals = Self::calculate_totals(&normalized)?;
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedVoucher {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok((normalized, totals))
    }

    fn normalize_leg(
        line: usize,
        leg: &VoucherLeg,
        scale: CurrencyScale,
    ) -> Result<NormalizedLeg, LedgerError> {
        if leg.debit < Decimal::ZERO || leg.credit < Decimal::ZERO {
            return Err(LedgerError::InvalidLegAmount {
                line,
                reason: "amount cannot be negative",
            });
        }

        let debit = scale.round(leg.debit);
        let credit = scale.round(leg.credit);
        if debit > MAX_AMOUNT || credit > MAX_AMOUNT {
            return Err(LedgerError::InvalidLegAmount {
                line,
                reason: "amount exceeds the storable range",
            });
        }

        let (entry_type, amount) = match (debit.is_zero(), credit.is_zero()) {
            (false, true) => (EntryType::Debit, debit),
            (true, false) => (EntryType::Credit, credit),
            (false, false) => {
                return Err(LedgerError::InvalidLegAmount {
                    line,
                    reason: "leg must be either a debit or a credit, not both",
                });
            }
            (true, true) => {
                return Err(LedgerError::InvalidLegAmount {
                    line,
                    reason: "amount is zero at the currency's precision",
                });
            }
        };

        Ok(NormalizedLeg {
            account: leg.account.clone(),
            entry_type,
            amount,
            description: leg.description.clone(),
            reference_no: leg.reference_no.clone(),
        })
    }

    /// Sums debits and credits.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidLegAmount` naming the first leg whose
    /// running total leaves the storable range.
    pub fn calculate_totals(legs: &[NormalizedLeg]) -> Result<VoucherTotals, LedgerError> {
        let (mut debit, mut credit) = (Decimal::ZERO, Decimal::ZERO);
        for (idx, leg) in legs.iter().enumerate() {
            let sums = debit
                .checked_add(leg.debit())
                .zip(credit.checked_add(leg.credit()))
                .filter(|(d, c)| *d <= MAX_AMOUNT && *c <= MAX_AMOUNT);
            let Some((d, c)) = sums else {
                return Err(LedgerError::InvalidLegAmount {
                    line: idx + 1,
                    reason: "voucher total exceeds the storable range",
                });
            };
            debit = d;
            credit = c;
        }
        Ok(VoucherTotals::new(debit, credit))
    }

    /// Resolves account references and numbers the lines from 1 in leg order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `account_lookup`.
    pub fn resolve_lines<A>(
        legs: Vec<NormalizedLeg>,
        account_lookup: A,
    ) -> Result<Vec<PostingLine>, LedgerError>
    where
        A: Fn(&AccountRef) -> Result<i64, LedgerError>,
    {
        legs.into_iter()
            .zip(1i32..)
            .map(|(leg, line_no)| {
                let account_id = account_lookup(&leg.account)?;
                Ok(PostingLine {
                    line_no,
                    account_id,
                    debit: leg.debit(),
                    credit: leg.credit(),
                    description: leg.description,
                    reference_no: leg.reference_no,
                })
            })
            .collect()
    }
}
