//! Holding data structures and their date-parameterized valuation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::valuation::{accrual, depreciation};

/// Periodic payment terms of a recurring flow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurringFlow {
    /// Day of month (1-31) on which each tick occurs
    pub day_of_month: u32,

    /// Signed amount added per elapsed period
    pub periodic_amount: f64,
}

impl RecurringFlow {
    pub fn new(day_of_month: u32, periodic_amount: f64) -> Self {
        Self {
            day_of_month,
            periodic_amount,
        }
    }

    /// Number of ticks between `start_date` and `date`
    pub fn ticks(&self, start_date: NaiveDate, date: NaiveDate) -> u32 {
        accrual::accrual_ticks(start_date, date, self.day_of_month)
    }

    /// Total amount accrued between `start_date` and `date`
    pub fn accrued(&self, start_date: NaiveDate, date: NaiveDate) -> f64 {
        self.ticks(start_date, date) as f64 * self.periodic_amount
    }
}

/// Kind of holding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoldingKind {
    /// Asset valued by linear depreciation only
    Simple,
    /// Asset that also accrues a fixed amount every month
    Recurring(RecurringFlow),
}

impl HoldingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldingKind::Simple => "simple",
            HoldingKind::Recurring(_) => "recurring",
        }
    }
}

/// A single tracked possession
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Name of the owner
    pub owner: String,

    /// Human-readable name
    pub label: String,

    /// Value at `start_date`
    pub base_value: f64,

    /// Date from which depreciation and accrual are measured
    pub start_date: NaiveDate,

    /// Date after which depreciation stops (None = open-ended)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Annual depreciation rate in percent (None = no depreciation)
    #[serde(default)]
    pub depreciation_rate: Option<f64>,

    pub kind: HoldingKind,
}

impl Holding {
    /// Create a simple holding
    pub fn new(
        owner: impl Into<String>,
        label: impl Into<String>,
        base_value: f64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        depreciation_rate: Option<f64>,
    ) -> Self {
        Self {
            owner: owner.into(),
            label: label.into(),
            base_value,
            start_date,
            end_date,
            depreciation_rate,
            kind: HoldingKind::Simple,
        }
    }

    /// Create a recurring flow
    pub fn recurring(
        owner: impl Into<String>,
        label: impl Into<String>,
        base_value: f64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        depreciation_rate: Option<f64>,
        day_of_month: u32,
        periodic_amount: f64,
    ) -> Self {
        Self {
            kind: HoldingKind::Recurring(RecurringFlow::new(day_of_month, periodic_amount)),
            ..Self::new(owner, label, base_value, start_date, end_date, depreciation_rate)
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.kind, HoldingKind::Recurring(_))
    }

    /// Base value after linear depreciation up to `date`
    pub fn depreciated_value(&self, date: NaiveDate) -> f64 {
        depreciation::depreciated_value(
            self.base_value,
            self.depreciation_rate,
            self.start_date,
            self.end_date,
            date,
        )
    }

    /// Amount accrued by periodic ticks up to `date` (0 for simple holdings)
    ///
    /// The end date only freezes depreciation; ticks keep accruing past it.
    pub fn accrued(&self, date: NaiveDate) -> f64 {
        match &self.kind {
            HoldingKind::Simple => 0.0,
            HoldingKind::Recurring(flow) => flow.accrued(self.start_date, date),
        }
    }

    /// Value of the holding at `date`
    ///
    /// Simple holdings depreciate; recurring flows add their accrued ticks to
    /// the undepreciated base value. Pure: repeated calls with the same date
    /// return the same value.
    pub fn value_at(&self, date: NaiveDate) -> f64 {
        let value = match &self.kind {
            HoldingKind::Simple => self.depreciated_value(date),
            HoldingKind::Recurring(_) => self.base_value + self.accrued(date),
        };
        log::debug!("{} ({}) at {}: {:.2}", self.label, self.kind.as_str(), date, value);
        value
    }
}

/// Holdings grouped under one owner, as in the `Patrimoine` data entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patrimony {
    pub owner: String,

    /// Reference date recorded with the entry, if any
    #[serde(default)]
    pub date: Option<NaiveDate>,

    pub holdings: Vec<Holding>,
}

impl Patrimony {
    pub fn new(owner: impl Into<String>, date: Option<NaiveDate>, holdings: Vec<Holding>) -> Self {
        Self {
            owner: owner.into(),
            date,
            holdings,
        }
    }

    /// Total value of all holdings at `date`
    pub fn value_at(&self, date: NaiveDate) -> f64 {
        crate::valuation::total_value(&self.holdings, date)
    }
}
