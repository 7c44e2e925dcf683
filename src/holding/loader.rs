//! Load holdings from the patrimony JSON data file or a flat CSV file

use super::{Holding, Patrimony};
use crate::error::{LoadError, PatrimonyResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default location of the patrimony data file
pub const DEFAULT_DATA_PATH: &str = "data/patrimoine.json";

/// Model tag of the entries that carry possessions
const PATRIMONY_MODEL: &str = "Patrimoine";

/// Top-level entry of the JSON data file
#[derive(Debug, Deserialize)]
struct JsonEntry {
    model: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonOwner {
    #[serde(rename = "nom")]
    name: String,
}

/// `data` payload of a `Patrimoine` entry
#[derive(Debug, Deserialize)]
struct JsonPatrimony {
    #[serde(rename = "possesseur")]
    owner: JsonOwner,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    possessions: Vec<JsonPossession>,
}

/// A possession as written in the JSON data file
#[derive(Debug, Deserialize)]
struct JsonPossession {
    #[serde(rename = "possesseur", default)]
    owner: Option<JsonOwner>,
    #[serde(rename = "libelle")]
    label: String,
    #[serde(rename = "valeur")]
    value: f64,
    #[serde(rename = "dateDebut")]
    start_date: String,
    #[serde(rename = "dateFin", default)]
    end_date: Option<String>,
    #[serde(rename = "tauxAmortissement", default)]
    depreciation_rate: Option<f64>,
    #[serde(rename = "jour", default)]
    day_of_month: Option<u32>,
    /// Outer `Some` when the key is present, even as `null`
    #[serde(rename = "valeurConstante", default, deserialize_with = "present")]
    periodic_amount: Option<Option<f64>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

impl JsonPossession {
    fn to_holding(self, default_owner: &str) -> PatrimonyResult<Holding> {
        let owner = self
            .owner
            .map(|o| o.name)
            .unwrap_or_else(|| default_owner.to_string());

        RawHolding {
            owner,
            label: self.label,
            value: self.value,
            start_date: self.start_date,
            end_date: self.end_date,
            depreciation_rate: self.depreciation_rate,
            day_of_month: self.day_of_month,
            // A null amount still marks a flow, one that accrues nothing
            periodic_amount: self.periodic_amount.map(|amount| amount.unwrap_or(0.0)),
        }
        .to_holding()
    }
}

/// Raw CSV row: owner,label,value,start_date,end_date,depreciation_rate,day_of_month,periodic_amount
#[derive(Debug, Deserialize)]
struct CsvRow {
    owner: String,
    label: String,
    value: f64,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    depreciation_rate: Option<f64>,
    #[serde(default)]
    day_of_month: Option<u32>,
    #[serde(default)]
    periodic_amount: Option<f64>,
}

impl From<CsvRow> for RawHolding {
    fn from(row: CsvRow) -> Self {
        Self {
            owner: row.owner,
            label: row.label,
            value: row.value,
            start_date: row.start_date,
            end_date: row.end_date,
            depreciation_rate: row.depreciation_rate,
            day_of_month: row.day_of_month,
            periodic_amount: row.periodic_amount,
        }
    }
}

/// Format-independent record, validated into a `Holding`
struct RawHolding {
    owner: String,
    label: String,
    value: f64,
    start_date: String,
    end_date: Option<String>,
    depreciation_rate: Option<f64>,
    day_of_month: Option<u32>,
    periodic_amount: Option<f64>,
}

impl RawHolding {
    fn to_holding(self) -> PatrimonyResult<Holding> {
        let start_date = parse_date(&self.label, &self.start_date)?;
        let end_date = match self.end_date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(parse_date(&self.label, s)?),
            _ => None,
        };

        if let Some(end) = end_date {
            if end < start_date {
                return Err(LoadError::EndBeforeStart {
                    label: self.label,
                    start: start_date,
                    end,
                });
            }
        }

        // A periodic amount is what marks a recurring flow
        let Some(periodic_amount) = self.periodic_amount else {
            return Ok(Holding::new(
                self.owner,
                self.label,
                self.value,
                start_date,
                end_date,
                self.depreciation_rate,
            ));
        };

        let day_of_month = match self.day_of_month {
            Some(day) if (1..=31).contains(&day) => day,
            Some(day) => return Err(LoadError::InvalidDayOfMonth { label: self.label, day }),
            None => {
                return Err(LoadError::MissingField {
                    label: self.label,
                    field: "day_of_month",
                })
            }
        };

        Ok(Holding::recurring(
            self.owner,
            self.label,
            self.value,
            start_date,
            end_date,
            self.depreciation_rate,
            day_of_month,
            periodic_amount,
        ))
    }
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS` timestamp
pub fn parse_date(label: &str, value: &str) -> PatrimonyResult<NaiveDate> {
    let value = value.trim();

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .map_err(|_| LoadError::InvalidDate {
            label: label.to_string(),
            value: value.to_string(),
        })
}

/// Load every `Patrimoine` entry from a JSON data file
pub fn load_patrimonies<P: AsRef<Path>>(path: P) -> PatrimonyResult<Vec<Patrimony>> {
    let file = File::open(path)?;
    load_patrimonies_from_reader(BufReader::new(file))
}

/// Load every `Patrimoine` entry from any reader
pub fn load_patrimonies_from_reader<R: Read>(reader: R) -> PatrimonyResult<Vec<Patrimony>> {
    let entries: Vec<JsonEntry> = serde_json::from_reader(reader)?;
    let mut patrimonies = Vec::new();

    for entry in entries {
        if entry.model != PATRIMONY_MODEL {
            log::debug!("Skipping '{}' entry", entry.model);
            continue;
        }

        let raw: JsonPatrimony = serde_json::from_value(entry.data)?;
        let owner = raw.owner.name;
        let date = match raw.date.as_deref() {
            Some(s) => Some(parse_date(&owner, s)?),
            None => None,
        };

        let holdings = raw
            .possessions
            .into_iter()
            .map(|p| p.to_holding(&owner))
            .collect::<PatrimonyResult<Vec<_>>>()?;

        patrimonies.push(Patrimony::new(owner, date, holdings));
    }

    if patrimonies.is_empty() {
        log::warn!("No '{}' entries found in data file", PATRIMONY_MODEL);
    }

    Ok(patrimonies)
}

/// Load the holdings of every `Patrimoine` entry from a JSON data file, in file order
pub fn load_holdings_json<P: AsRef<Path>>(path: P) -> PatrimonyResult<Vec<Holding>> {
    let holdings: Vec<Holding> = load_patrimonies(path)?
        .into_iter()
        .flat_map(|p| p.holdings)
        .collect();
    log::info!("Loaded {} holdings from JSON", holdings.len());
    Ok(holdings)
}

/// Load holdings from a flat CSV file
pub fn load_holdings_csv<P: AsRef<Path>>(path: P) -> PatrimonyResult<Vec<Holding>> {
    let file = File::open(path)?;
    let holdings = load_holdings_csv_from_reader(file)?;
    log::info!("Loaded {} holdings from CSV", holdings.len());
    Ok(holdings)
}

/// Load holdings from any CSV reader (e.g., string buffer, network stream)
pub fn load_holdings_csv_from_reader<R: Read>(reader: R) -> PatrimonyResult<Vec<Holding>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut holdings = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        holdings.push(RawHolding::from(row).to_holding()?);
    }

    Ok(holdings)
}

/// Load holdings from a `.json` or `.csv` file, chosen by extension
pub fn load_holdings<P: AsRef<Path>>(path: P) -> PatrimonyResult<Vec<Holding>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => load_holdings_json(path),
        Some("csv") => load_holdings_csv(path),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load holdings from the default data file location
pub fn load_default_holdings() -> PatrimonyResult<Vec<Holding>> {
    load_holdings(DEFAULT_DATA_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holding::{HoldingKind, RecurringFlow};

    const SAMPLE_JSON: &str = r#"[
        { "model": "Personne", "data": { "nom": "Rakoto" } },
        {
            "model": "Patrimoine",
            "data": {
                "possesseur": { "nom": "Rakoto" },
                "date": "2024-01-01T00:00:00.000Z",
                "possessions": [
                    {
                        "possesseur": { "nom": "Rakoto" },
                        "libelle": "Laptop",
                        "valeur": 4000000,
                        "dateDebut": "2023-12-25T00:00:00.000Z",
                        "dateFin": null,
                        "tauxAmortissement": 10
                    },
                    {
                        "libelle": "Salary",
                        "valeur": 0,
                        "dateDebut": "2023-01-01",
                        "dateFin": null,
                        "tauxAmortissement": null,
                        "jour": 1,
                        "valeurConstante": 500000
                    }
                ]
            }
        }
    ]"#;

    #[test]
    fn test_load_json_from_reader() {
        let patrimonies = load_patrimonies_from_reader(SAMPLE_JSON.as_bytes()).unwrap();
        assert_eq!(patrimonies.len(), 1);

        let patrimony = &patrimonies[0];
        assert_eq!(patrimony.owner, "Rakoto");
        assert_eq!(patrimony.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(patrimony.holdings.len(), 2);

        let laptop = &patrimony.holdings[0];
        assert_eq!(laptop.label, "Laptop");
        assert_eq!(laptop.start_date, NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());
        assert_eq!(laptop.end_date, None);
        assert_eq!(laptop.depreciation_rate, Some(10.0));
        assert_eq!(laptop.kind, HoldingKind::Simple);

        // Owner falls back to the patrimony owner
        let salary = &patrimony.holdings[1];
        assert_eq!(salary.owner, "Rakoto");
        assert_eq!(salary.depreciation_rate, None);
        match salary.kind {
            HoldingKind::Recurring(flow) => {
                assert_eq!(flow.day_of_month, 1);
                assert_eq!(flow.periodic_amount, 500_000.0);
            }
            HoldingKind::Simple => panic!("expected a recurring flow"),
        }
    }

    #[test]
    fn test_json_recurring_without_day_is_rejected() {
        let json = r#"[{ "model": "Patrimoine", "data": {
            "possesseur": { "nom": "A" },
            "possessions": [{ "libelle": "Rent", "valeur": 0, "dateDebut": "2024-01-01", "valeurConstante": -300 }]
        }}]"#;
        let err = load_patrimonies_from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field: "day_of_month", .. }));
    }

    #[test]
    fn test_json_null_amount_is_still_recurring() {
        let json = r#"[{ "model": "Patrimoine", "data": {
            "possesseur": { "nom": "A" },
            "possessions": [{ "libelle": "Allowance", "valeur": 50, "dateDebut": "2024-01-01", "jour": 1, "valeurConstante": null }]
        }}]"#;
        let patrimonies = load_patrimonies_from_reader(json.as_bytes()).unwrap();
        let holding = &patrimonies[0].holdings[0];
        assert_eq!(holding.kind, HoldingKind::Recurring(RecurringFlow::new(1, 0.0)));
        assert_eq!(holding.value_at(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), 50.0);
    }

    #[test]
    fn test_json_invalid_date_is_rejected() {
        let json = r#"[{ "model": "Patrimoine", "data": {
            "possesseur": { "nom": "A" },
            "possessions": [{ "libelle": "Desk", "valeur": 10, "dateDebut": "25/12/2023" }]
        }}]"#;
        let err = load_patrimonies_from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidDate { .. }));
    }

    #[test]
    fn test_load_csv_from_reader() {
        let csv = "\
owner,label,value,start_date,end_date,depreciation_rate,day_of_month,periodic_amount
Rakoto,Laptop,4000000,2023-12-25,,10,,
Rakoto,Salary,0,2023-01-01,2025-12-31,,1,500000
";
        let holdings = load_holdings_csv_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(holdings.len(), 2);
        assert!(!holdings[0].is_recurring());
        assert_eq!(holdings[0].end_date, None);
        assert!(holdings[1].is_recurring());
        assert_eq!(holdings[1].end_date, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn test_csv_invalid_day_of_month() {
        let csv = "\
owner,label,value,start_date,end_date,depreciation_rate,day_of_month,periodic_amount
A,Rent,0,2024-01-01,,,32,-300
";
        let err = load_holdings_csv_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidDayOfMonth { day: 32, .. }));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let csv = "\
owner,label,value,start_date,end_date,depreciation_rate,day_of_month,periodic_amount
A,Car,1000,2024-01-01,2023-01-01,20,,
";
        let err = load_holdings_csv_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::EndBeforeStart { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_holdings("holdings.xlsx").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_bundled_data_files() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));

        let from_json = load_holdings(root.join(DEFAULT_DATA_PATH)).expect("Failed to load JSON data");
        assert!(!from_json.is_empty());
        assert!(from_json.iter().any(|h| h.is_recurring()));

        let from_csv = load_holdings(root.join("data/holdings.csv")).expect("Failed to load CSV data");
        assert_eq!(from_csv.len(), from_json.len());
    }
}
