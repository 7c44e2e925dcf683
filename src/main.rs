//! Patrimony CLI
//!
//! Loads holdings from a data file and prints their values at a chosen date

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use patrimony::holding::{load_holdings, DEFAULT_DATA_PATH};
use patrimony::{ValuationConfig, ValuationEngine, ValuationResult};
use std::io::{self, Write};
use std::path::PathBuf;

/// Value a patrimony at an evaluation date
#[derive(Parser)]
#[command(name = "patrimony")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data file (.json patrimony file or .csv holdings file)
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Only value holdings of this owner
    #[arg(long)]
    owner: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable table
    Table,
    /// One CSV row per holding
    Csv,
    /// Full result as JSON
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let holdings = load_holdings(&cli.data)
        .with_context(|| format!("Failed to load holdings from {}", cli.data.display()))?;
    log::info!("Loaded {} holdings from {}", holdings.len(), cli.data.display());

    let mut config = ValuationConfig::default();
    if let Some(date) = cli.date {
        config.evaluation_date = date;
    }

    let engine = ValuationEngine::new(config);
    let mut result = engine.value_portfolio(&holdings);
    if let Some(owner) = &cli.owner {
        result = result.for_owner(owner);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Table => write_table(&mut out, &result)?,
        OutputFormat::Csv => write_csv(&mut out, &result)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, result: &ValuationResult) -> Result<()> {
    writeln!(out, "Patrimony at {}", result.evaluation_date)?;
    writeln!(out, "{}", "=".repeat(98))?;
    writeln!(
        out,
        "{:<24} {:>16} {:>12} {:>12} {:>12} {:>16}",
        "Label", "Initial Value", "Start", "End", "Rate (%)", "Value"
    )?;
    writeln!(out, "{}", "-".repeat(98))?;

    for row in &result.rows {
        writeln!(
            out,
            "{:<24} {:>16.2} {:>12} {:>12} {:>12} {:>16.2}",
            row.label,
            row.initial_value,
            row.start_date,
            row.end_date_display(),
            row.depreciation_rate_display(),
            row.value,
        )?;
    }

    writeln!(out, "{}", "-".repeat(98))?;
    writeln!(out, "Total: {:.2}", result.total)?;

    let summary = result.summary();
    if summary.totals_by_owner.len() > 1 {
        writeln!(out, "\nBy owner:")?;
        for (owner, total) in &summary.totals_by_owner {
            writeln!(out, "  {:<22} {:>16.2}", owner, total)?;
        }
    }

    Ok(())
}

fn write_csv<W: Write>(out: &mut W, result: &ValuationResult) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "owner",
        "label",
        "kind",
        "initial_value",
        "start_date",
        "end_date",
        "depreciation_rate",
        "value",
    ])?;

    for row in &result.rows {
        writer.write_record([
            row.owner.clone(),
            row.label.clone(),
            row.kind.as_str().to_string(),
            format!("{:.2}", row.initial_value),
            row.start_date.to_string(),
            row.end_date_display(),
            row.depreciation_rate_display(),
            format!("{:.2}", row.value),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
