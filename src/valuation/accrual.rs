//! Accrual tick counting for recurring flows
//!
//! A recurring flow pays its periodic amount once per month, on the anchor
//! day. Ticks are counted with month/year arithmetic only:
//!
//! - the start month contributes one tick if it starts before the anchor day
//!   (and, within the start month itself, once the anchor day is reached);
//! - the evaluation month contributes one tick once its anchor day has passed,
//!   unless it is the start month;
//! - every full month strictly between the two contributes one tick.

use chrono::{Datelike, NaiveDate};

/// Whether two dates fall in the same calendar month of the same year
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Number of whole calendar months strictly between the months of `start` and `date`
///
/// Negative when `date` is in the same month as `start` or earlier.
pub fn months_between(start: NaiveDate, date: NaiveDate) -> i32 {
    (date.year() - start.year()) * 12 + (date.month() as i32 - start.month() as i32) - 1
}

/// Count accrual ticks between `start` and `date` for a flow anchored on `day_of_month`
pub fn accrual_ticks(start: NaiveDate, date: NaiveDate, day_of_month: u32) -> u32 {
    if date < start {
        return 0;
    }

    let in_start_month = same_month(start, date);
    let mut count = 0;

    if start.day() < day_of_month && (!in_start_month || date.day() >= day_of_month) {
        count += 1;
    }

    if date.day() >= day_of_month && !in_start_month {
        count += 1;
    }

    count + months_between(start, date).max(0) as u32
}
