//! Valuation engine for holding collections

use chrono::NaiveDate;
use rayon::prelude::*;

use super::report::{ValuationResult, ValuationRow};
use crate::holding::Holding;

/// Configuration for a valuation run
#[derive(Debug, Clone)]
pub struct ValuationConfig {
    /// Date at which every holding is valued
    pub evaluation_date: NaiveDate,

    /// Keep per-holding rows in the result
    pub detailed_output: bool,
}

impl ValuationConfig {
    pub fn at(evaluation_date: NaiveDate) -> Self {
        Self {
            evaluation_date,
            ..Default::default()
        }
    }
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            evaluation_date: chrono::Local::now().date_naive(),
            detailed_output: true,
        }
    }
}

/// Sum of every holding's value at `date`
pub fn total_value(holdings: &[Holding], date: NaiveDate) -> f64 {
    holdings.iter().map(|h| h.value_at(date)).sum()
}

/// Values holdings at the configured evaluation date
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    config: ValuationConfig,
}

impl ValuationEngine {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    /// Value every holding in order and total them
    pub fn value_portfolio(&self, holdings: &[Holding]) -> ValuationResult {
        let date = self.config.evaluation_date;
        log::debug!("Valuing {} holdings at {}", holdings.len(), date);

        if !self.config.detailed_output {
            return ValuationResult {
                evaluation_date: date,
                rows: Vec::new(),
                total: total_value(holdings, date),
            };
        }

        let rows = holdings
            .iter()
            .map(|h| ValuationRow::from_holding(h, date))
            .collect();
        ValuationResult::from_rows(date, rows)
    }

    /// Same as [`value_portfolio`](Self::value_portfolio), fanned out over the rayon pool
    ///
    /// Row order follows `holdings`.
    pub fn value_portfolio_par(&self, holdings: &[Holding]) -> ValuationResult {
        let date = self.config.evaluation_date;

        if !self.config.detailed_output {
            return ValuationResult {
                evaluation_date: date,
                rows: Vec::new(),
                total: holdings.par_iter().map(|h| h.value_at(date)).sum(),
            };
        }

        let rows = holdings
            .par_iter()
            .map(|h| ValuationRow::from_holding(h, date))
            .collect();
        ValuationResult::from_rows(date, rows)
    }
}
