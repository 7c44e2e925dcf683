//! Holding data structures and data file loading

mod data;
pub mod loader;

pub use data::{Holding, HoldingKind, Patrimony, RecurringFlow};
pub use loader::{
    load_default_holdings, load_holdings, load_holdings_csv, load_holdings_csv_from_reader,
    load_holdings_json, load_patrimonies, load_patrimonies_from_reader, DEFAULT_DATA_PATH,
};
