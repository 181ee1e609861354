//! Property-based tests for fiscal windows.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use super::window::{FiscalWindow, suffixed_code};

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The window always contains the date it was built for.
    #[test]
    fn prop_window_contains_date(date in arb_date(), start_month in 1u32..=12) {
        let window = FiscalWindow::containing(date, start_month).unwrap();
        prop_assert!(window.contains(date));
    }

    /// Windows start on the 1st of the start month and span twelve months.
    #[test]
    fn prop_window_spans_twelve_months(date in arb_date(), start_month in 1u32..=12) {
        let window = FiscalWindow::containing(date, start_month).unwrap();
        prop_assert_eq!(window.start_date.day(), 1);
        prop_assert_eq!(window.start_date.month(), start_month);
        let next_start = window.end_date.succ_opt().unwrap();
        prop_assert_eq!(next_start.day(), 1);
        prop_assert_eq!(next_start.month(), start_month);
        prop_assert_eq!(next_start.year(), window.start_date.year() + 1);
    }

    /// Same window for any two dates inside it (resolution is stable).
    #[test]
    fn prop_window_is_stable(date in arb_date(), start_month in 1u32..=12) {
        let window = FiscalWindow::containing(date, start_month).unwrap();
        prop_assert_eq!(FiscalWindow::containing(window.start_date, start_month), Some(window));
        prop_assert_eq!(FiscalWindow::containing(window.end_date, start_month), Some(window));
    }

    /// Codes start with FY and the start year; suffixes never collide with the base.
    #[test]
    fn prop_code_shape(date in arb_date(), start_month in 1u32..=12, attempt in 2u32..=5) {
        let window = FiscalWindow::containing(date, start_month).unwrap();
        let code = window.code();
        let expected_prefix = format!("FY{}", window.start_date.year());
        prop_assert!(code.starts_with(&expected_prefix));
        prop_assert_eq!(code.contains('/'), start_month != 1);
        prop_assert_ne!(suffixed_code(&code, attempt), code);
    }
}
