//! Heuristic best-fit account ranking.
//!
//! Ranking, best first:
//! 1. exact well-known code
//! 2. name contains the primary keyword and the group nature matches
//! 3. name contains the secondary keyword and the group nature matches
//!
//! Ties break on ascending account code. Only active, postable accounts
//! are ever returned.

use super::types::{AccountCandidate, AccountNature, PostingPurpose};

/// Search hint for one posting purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountHint {
    /// Code that wins outright when present.
    pub well_known_code: Option<&'static str>,
    /// Preferred name fragment (case-insensitive).
    pub primary_keyword: &'static str,
    /// Fallback name fragment (case-insensitive).
    pub secondary_keyword: Option<&'static str>,
    /// Required group nature for keyword matches.
    pub nature: AccountNature,
}

impl AccountHint {
    /// Returns the built-in hint for a posting purpose.
    #[must_use]
    pub const fn for_purpose(purpose: PostingPurpose) -> Self {
        match purpose {
            PostingPurpose::Inventory => Self::keywords("inventory", Some("stock"), AccountNature::Asset),
            PostingPurpose::VatInput => Self {
                well_known_code: Some("1410"),
                primary_keyword: "input tax",
                secondary_keyword: Some("vat"),
                nature: AccountNature::Asset,
            },
            PostingPurpose::GrnClearing => {
                Self::keywords("grn", Some("clearing"), AccountNature::Liability)
            }
            PostingPurpose::SalesRevenue => {
                Self::keywords("sales", Some("revenue"), AccountNature::Income)
            }
            PostingPurpose::CostOfSales => {
                Self::keywords("cost of sales", Some("cost of goods"), AccountNature::Expense)
            }
            PostingPurpose::StockAdjustment => Self::keywords(
                "stock adjustment",
                Some("inventory adjustment"),
                AccountNature::Expense,
            ),
            PostingPurpose::Cash => Self::keywords("cash", Some("bank"), AccountNature::Asset),
            PostingPurpose::VatOutput => Self {
                well_known_code: Some("2210"),
                primary_keyword: "output tax",
                secondary_keyword: Some("vat"),
                nature: AccountNature::Liability,
            },
        }
    }

    const fn keywords(
        primary_keyword: &'static str,
        secondary_keyword: Option<&'static str>,
        nature: AccountNature,
    ) -> Self {
        Self {
            well_known_code: None,
            primary_keyword,
            secondary_keyword,
            nature,
        }
    }

    /// Rank of a candidate under this hint; lower is better, `None` is no match.
    #[must_use]
    pub fn rank(&self, candidate: &AccountCandidate) -> Option<u8> {
        if !is_eligible(candidate) {
            return None;
        }
        if self.well_known_code == Some(candidate.code.as_str()) {
            return Some(0);
        }
        if candidate.nature != self.nature {
            return None;
        }
        let name = candidate.name.to_lowercase();
        if name.contains(self.primary_keyword) {
            return Some(1);
        }
        match self.secondary_keyword {
            Some(keyword) if name.contains(keyword) => Some(2),
            _ => None,
        }
    }
}

/// Returns true if the account may receive postings.
#[must_use]
pub const fn is_eligible(candidate: &AccountCandidate) -> bool {
    candidate.is_active && candidate.is_postable
}

/// Picks the best-fit account for a hint, or `None` if nothing qualifies.
#[must_use]
pub fn pick_best_account<'a>(
    candidates: &'a [AccountCandidate],
    hint: &AccountHint,
) -> Option<&'a AccountCandidate> {
    candidates
        .iter()
        .filter_map(|c| hint.rank(c).map(|rank| (rank, c)))
        .min_by(|(ra, a), (rb, b)| ra.cmp(rb).then_with(|| a.code.cmp(&b.code)))
        .map(|(_, c)| c)
}
