//! Twelve-month fiscal windows anchored on a company's start month.

use chrono::{Datelike, NaiveDate};

use super::error::FiscalError;

/// Upper bound on code candidates tried when synthesising a year.
pub const MAX_CODE_ATTEMPTS: u32 = 5;

/// Clamps a configured start month into 1..=12.
#[must_use]
pub fn clamp_start_month(month: i32) -> u32 {
    month.clamp(1, 12).unsigned_abs()
}

/// A fiscal year's date range, before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalWindow {
    /// First day of the year.
    pub start_date: NaiveDate,
    /// Last day of the year.
    pub end_date: NaiveDate,
}

impl FiscalWindow {
    /// Computes the window containing `date` for a year starting in `start_month`.
    ///
    /// Returns `None` only when the window falls outside chrono's date range.
    #[must_use]
    pub fn containing(date: NaiveDate, start_month: u32) -> Option<Self> {
        let start_month = start_month.clamp(1, 12);
        let start_year = if date.month() >= start_month {
            date.year()
        } else {
            date.year() - 1
        };
        let start_date = NaiveDate::from_ymd_opt(start_year, start_month, 1)?;
        let end_date = NaiveDate::from_ymd_opt(start_year + 1, start_month, 1)?.pred_opt()?;
        Some(Self {
            start_date,
            end_date,
        })
    }

    /// Returns true if the date falls within the window (inclusive).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Year code: `FY2026` for calendar years, `FY2025/26` otherwise.
    #[must_use]
    pub fn code(&self) -> String {
        let start_year = self.start_date.year();
        if self.start_date.month() == 1 {
            format!("FY{start_year}")
        } else {
            format!("FY{start_year}/{:02}", (start_year + 1).rem_euclid(100))
        }
    }
}

/// Code for the n-th attempt: the base code first, then `-2`, `-3`, ...
#[must_use]
pub fn suffixed_code(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

/// Parses a `YYYY-MM-DD` posting date.
///
/// # Errors
///
/// Returns `FiscalError::Unresolvable` for empty or malformed input.
pub fn parse_posting_date(raw: &str) -> Result<NaiveDate, FiscalError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FiscalError::Unresolvable("date is required".to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| FiscalError::Unresolvable(format!("invalid date '{raw}': {e}")))
}
