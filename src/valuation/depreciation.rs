//! Date arithmetic and linear depreciation

use chrono::{Datelike, NaiveDate};

/// Days per year used for the day component of elapsed time
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Cap an evaluation date at an optional end date
pub fn effective_date(date: NaiveDate, end_date: Option<NaiveDate>) -> NaiveDate {
    match end_date {
        Some(end) if date > end => end,
        _ => date,
    }
}

/// Elapsed time in years between two calendar dates
///
/// Computed component-wise: whole years, plus month difference / 12, plus
/// day difference / 365. A `date` on or before `start` yields 0.
pub fn elapsed_years(start: NaiveDate, date: NaiveDate) -> f64 {
    if date <= start {
        return 0.0;
    }

    let years = date.year() - start.year();
    let months = date.month() as i32 - start.month() as i32;
    let days = date.day() as i32 - start.day() as i32;

    (years as f64 + months as f64 / 12.0 + days as f64 / DAYS_PER_YEAR).max(0.0)
}

/// Remaining fraction of the base value after `elapsed` years at `rate_percent` per year
pub fn remaining_fraction(rate_percent: f64, elapsed: f64) -> f64 {
    1.0 - elapsed * rate_percent / 100.0
}

/// Value of `base_value` at `date` under linear depreciation
///
/// Without a rate the base value is returned unchanged. With a rate the
/// result is floored at zero, and depreciation stops accruing at `end_date`.
pub fn depreciated_value(
    base_value: f64,
    rate_percent: Option<f64>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    date: NaiveDate,
) -> f64 {
    let Some(rate) = rate_percent else {
        return base_value;
    };

    let effective = effective_date(date, end_date);
    let elapsed = elapsed_years(start_date, effective);
    (base_value * remaining_fraction(rate, elapsed)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_elapsed_years_components() {
        assert_abs_diff_eq!(elapsed_years(d(2020, 1, 1), d(2021, 1, 1)), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(elapsed_years(d(2020, 1, 1), d(2020, 7, 1)), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            elapsed_years(d(2020, 1, 1), d(2020, 1, 11)),
            10.0 / 365.0,
            epsilon = 1e-12
        );
        // Dec -> Jan across a year boundary: 1 year - 11 months = 1 month
        assert_abs_diff_eq!(
            elapsed_years(d(2020, 12, 15), d(2021, 1, 15)),
            1.0 / 12.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_elapsed_years_before_start_is_zero() {
        assert_eq!(elapsed_years(d(2024, 5, 1), d(2023, 1, 1)), 0.0);
        assert_eq!(elapsed_years(d(2024, 5, 1), d(2024, 5, 1)), 0.0);
    }

    #[test]
    fn test_elapsed_years_monotonic_over_month_ends() {
        let start = d(2023, 1, 31);
        let mut date = start;
        let mut previous = 0.0;
        for _ in 0..800 {
            date = date.succ_opt().unwrap();
            let elapsed = elapsed_years(start, date);
            assert!(elapsed >= previous, "elapsed went backwards at {}", date);
            previous = elapsed;
        }
    }

    #[test]
    fn test_effective_date_caps_at_end() {
        assert_eq!(effective_date(d(2025, 1, 1), Some(d(2024, 6, 30))), d(2024, 6, 30));
        assert_eq!(effective_date(d(2024, 1, 1), Some(d(2024, 6, 30))), d(2024, 1, 1));
        assert_eq!(effective_date(d(2024, 1, 1), None), d(2024, 1, 1));
    }

    #[test]
    fn test_depreciated_value_linear() {
        // 10% per year for 2 years on 1000
        let value = depreciated_value(1000.0, Some(10.0), d(2020, 3, 1), None, d(2022, 3, 1));
        assert_abs_diff_eq!(value, 800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_depreciated_value_without_rate() {
        let value = depreciated_value(1234.5, None, d(2020, 3, 1), None, d(2040, 3, 1));
        assert_eq!(value, 1234.5);
    }

    #[test]
    fn test_depreciated_value_floored() {
        // 50% per year for 5 years would go well below zero
        let value = depreciated_value(1000.0, Some(50.0), d(2020, 1, 1), None, d(2025, 1, 1));
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_depreciated_value_negative_base_floored() {
        let value = depreciated_value(-1000.0, Some(10.0), d(2020, 1, 1), None, d(2022, 1, 1));
        assert_eq!(value, 0.0);
        assert_eq!(depreciated_value(-1000.0, None, d(2020, 1, 1), None, d(2022, 1, 1)), -1000.0);
    }
}
