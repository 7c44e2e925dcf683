//! Patrimony - valuation engine for personal holdings
//!
//! This library provides:
//! - Holdings with optional linear depreciation and end dates
//! - Recurring flows accruing a fixed amount once per month on an anchor day
//! - Portfolio valuation and totals at any evaluation date
//! - Loading from the patrimony JSON data file or a flat CSV file
//! - Timeline valuation across many dates

pub mod error;
pub mod holding;
pub mod valuation;
pub mod runner;

// Re-export commonly used types
pub use error::{LoadError, PatrimonyResult};
pub use holding::{Holding, HoldingKind, Patrimony, RecurringFlow};
pub use valuation::{total_value, ValuationConfig, ValuationEngine, ValuationResult, ValuationRow};
pub use runner::{TimelinePoint, TimelineRunner};
