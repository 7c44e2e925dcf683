//! Value a patrimony on the same day of every month over a date range
//!
//! Writes one CSV row per month with the total and the per-owner totals

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use patrimony::holding::DEFAULT_DATA_PATH;
use patrimony::runner::monthly_dates;
use patrimony::TimelineRunner;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "value_timeline")]
#[command(about = "Monthly patrimony totals over a date range")]
struct Args {
    /// Data file (.json patrimony file or .csv holdings file)
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// First evaluation date (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,

    /// Last evaluation date (YYYY-MM-DD)
    #[arg(long)]
    to: NaiveDate,

    /// Output CSV path
    #[arg(short, long, default_value = "timeline_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.to < args.from {
        bail!("--to ({}) is before --from ({})", args.to, args.from);
    }

    let start = Instant::now();
    let runner = TimelineRunner::from_path(&args.data)
        .with_context(|| format!("Failed to load holdings from {}", args.data.display()))?;
    println!("Loaded {} holdings in {:?}", runner.holdings().len(), start.elapsed());

    let owners: BTreeSet<&str> = runner.holdings().iter().map(|h| h.owner.as_str()).collect();
    let dates = monthly_dates(args.from, args.to);

    // Per-owner totals need full rows, so run each date in parallel
    let results: Vec<_> = dates.par_iter().map(|&date| runner.run(date)).collect();

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec!["Date".to_string(), "Total".to_string()];
    header.extend(owners.iter().map(|o| o.to_string()));
    writer.write_record(&header)?;

    for result in &results {
        let summary = result.summary();
        let mut record = vec![result.evaluation_date.to_string(), format!("{:.2}", result.total)];
        record.extend(owners.iter().map(|o| {
            format!("{:.2}", summary.totals_by_owner.get(*o).copied().unwrap_or(0.0))
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!("{} months written to {}", results.len(), args.output.display());

    if let (Some(first), Some(last)) = (results.first(), results.last()) {
        println!("\nTimeline Summary:");
        println!("  {}: {:.2}", first.evaluation_date, first.total);
        println!("  {}: {:.2}", last.evaluation_date, last.total);
        println!("  Change: {:.2}", last.total - first.total);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
