//! Valuation of holdings at an evaluation date

pub mod accrual;
pub mod depreciation;
mod engine;
mod report;

pub use engine::{total_value, ValuationConfig, ValuationEngine};
pub use report::{ValuationResult, ValuationRow, ValuationSummary, NOT_APPLICABLE};
