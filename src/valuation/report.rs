//! Valuation output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::holding::{Holding, HoldingKind};

/// Marker rendered for absent end dates and depreciation rates
pub const NOT_APPLICABLE: &str = "N/A";

/// One holding valued at the evaluation date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRow {
    pub owner: String,
    pub label: String,
    pub kind: HoldingKind,
    pub initial_value: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub depreciation_rate: Option<f64>,
    pub value: f64,
}

impl ValuationRow {
    /// Value `holding` at `date`
    pub fn from_holding(holding: &Holding, date: NaiveDate) -> Self {
        Self {
            owner: holding.owner.clone(),
            label: holding.label.clone(),
            kind: holding.kind,
            initial_value: holding.base_value,
            start_date: holding.start_date,
            end_date: holding.end_date,
            depreciation_rate: holding.depreciation_rate,
            value: holding.value_at(date),
        }
    }

    pub fn end_date_display(&self) -> String {
        self.end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| NOT_APPLICABLE.to_string())
    }

    /// Rate with two decimals, N/A when absent or zero
    pub fn depreciation_rate_display(&self) -> String {
        match self.depreciation_rate {
            Some(rate) if rate != 0.0 => format!("{:.2}", rate),
            _ => NOT_APPLICABLE.to_string(),
        }
    }
}

/// Result of valuing a collection of holdings at one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub evaluation_date: NaiveDate,

    /// Per-holding rows (empty when detailed output is off)
    pub rows: Vec<ValuationRow>,

    /// Sum of every holding's value
    pub total: f64,
}

impl ValuationResult {
    /// Build a result whose total is the sum of `rows`
    pub fn from_rows(evaluation_date: NaiveDate, rows: Vec<ValuationRow>) -> Self {
        let total = rows.iter().map(|r| r.value).sum();
        Self {
            evaluation_date,
            rows,
            total,
        }
    }

    /// Keep only rows belonging to `owner`, recomputing the total
    pub fn for_owner(&self, owner: &str) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        Self::from_rows(self.evaluation_date, rows)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ValuationSummary {
        let mut totals_by_owner = BTreeMap::new();
        for row in &self.rows {
            *totals_by_owner.entry(row.owner.clone()).or_insert(0.0) += row.value;
        }

        ValuationSummary {
            evaluation_date: self.evaluation_date,
            holding_count: self.rows.len(),
            recurring_count: self
                .rows
                .iter()
                .filter(|r| matches!(r.kind, HoldingKind::Recurring(_)))
                .count(),
            total_initial: self.rows.iter().map(|r| r.initial_value).sum(),
            total_value: self.total,
            totals_by_owner,
        }
    }
}

/// Summary of a valuation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSummary {
    pub evaluation_date: NaiveDate,
    pub holding_count: usize,
    pub recurring_count: usize,
    pub total_initial: f64,
    pub total_value: f64,
    pub totals_by_owner: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_rows(date: NaiveDate) -> Vec<ValuationRow> {
        let holdings = [
            Holding::new("Ilo", "Laptop", 1000.0, d(2023, 1, 1), None, Some(10.0)),
            Holding::new("Ilo", "Cash", 250.0, d(2023, 1, 1), Some(d(2030, 1, 1)), None),
            Holding::recurring("Vola", "Salary", 0.0, d(2024, 1, 10), None, None, 15, 100.0),
        ];
        holdings.iter().map(|h| ValuationRow::from_holding(h, date)).collect()
    }

    #[test]
    fn test_display_markers() {
        let rows = sample_rows(d(2024, 1, 1));
        assert_eq!(rows[0].end_date_display(), "N/A");
        assert_eq!(rows[0].depreciation_rate_display(), "10.00");
        assert_eq!(rows[1].end_date_display(), "2030-01-01");
        assert_eq!(rows[1].depreciation_rate_display(), "N/A");
    }

    #[test]
    fn test_summary() {
        let result = ValuationResult::from_rows(d(2024, 3, 20), sample_rows(d(2024, 3, 20)));
        let summary = result.summary();

        assert_eq!(summary.holding_count, 3);
        assert_eq!(summary.recurring_count, 1);
        assert_eq!(result.rows[2].kind.as_str(), "recurring");
        assert_abs_diff_eq!(summary.total_initial, 1250.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.totals_by_owner["Vola"], 300.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            summary.totals_by_owner.values().sum::<f64>(),
            result.total,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_for_owner() {
        let result = ValuationResult::from_rows(d(2024, 3, 20), sample_rows(d(2024, 3, 20)));
        let ilo = result.for_owner("Ilo");
        assert_eq!(ilo.rows.len(), 2);
        assert_abs_diff_eq!(ilo.total + 300.0, result.total, epsilon = 1e-9);
    }
}
