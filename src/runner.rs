//! Timeline runner for valuing the same holdings at many dates
//!
//! Loads holdings once, then values them at any number of evaluation dates
//! without re-reading the data file.

use chrono::{Months, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PatrimonyResult;
use crate::holding::{load_holdings, Holding};
use crate::valuation::{total_value, ValuationConfig, ValuationEngine, ValuationResult};

/// Total value at one date of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub total: f64,
}

/// Pre-loaded holdings valued across many dates
///
/// # Example
/// ```ignore
/// let runner = TimelineRunner::from_path("data/patrimoine.json")?;
/// for point in runner.monthly_series(from, to) {
///     println!("{} {:.2}", point.date, point.total);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TimelineRunner {
    holdings: Vec<Holding>,
}

impl TimelineRunner {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    /// Create runner by loading holdings from a `.json` or `.csv` file
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> PatrimonyResult<Self> {
        Ok(Self::new(load_holdings(path)?))
    }

    /// Full valuation at a single date
    pub fn run(&self, date: NaiveDate) -> ValuationResult {
        ValuationEngine::new(ValuationConfig::at(date)).value_portfolio(&self.holdings)
    }

    /// Totals at each date, in the order given
    pub fn run_dates(&self, dates: &[NaiveDate]) -> Vec<TimelinePoint> {
        dates
            .par_iter()
            .map(|&date| TimelinePoint {
                date,
                total: total_value(&self.holdings, date),
            })
            .collect()
    }

    /// Totals on the same day of every month from `from` up to and including `to`
    ///
    /// Days past the end of a shorter month land on that month's last day.
    pub fn monthly_series(&self, from: NaiveDate, to: NaiveDate) -> Vec<TimelinePoint> {
        self.run_dates(&monthly_dates(from, to))
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }
}

/// Dates on the day of `from` in every month through `to`
pub fn monthly_dates(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut offset = 0;

    // checked_add_months clamps to the last day of shorter months
    while let Some(date) = from.checked_add_months(Months::new(offset)) {
        if date > to {
            break;
        }
        dates.push(date);
        offset += 1;
    }

    dates
}
