//! File-based scenario inputs
//!
//! Scenario catalogs come from CSV (one row per scenario, blank cells keep
//! the baseline value). Baselines come from JSON objects keyed by parameter
//! name; missing keys take the built-in defaults.

use super::{ScenarioOverride, ScenarioParameters, PARAMETER_NAMES};
use crate::error::{ProjectionError, Result};
use crate::scenario::ScenarioCatalog;
use csv::Reader;
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "data/scenarios.csv";

/// Raw CSV row of a scenario catalog
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    name: String,
    home_price: Option<f64>,
    purchase_discount_pct: Option<f64>,
    appreciation_pct: Option<f64>,
    expense_vacancy_pct: Option<f64>,
    loan_rate_pct: Option<f64>,
    rent_income_pct: Option<f64>,
    pct_down: Option<f64>,
    rental_appreciation_pct: Option<f64>,
    years: Option<u32>,
    principal_paydown_pct: Option<f64>,
}

impl CsvRow {
    fn into_entry(self) -> (String, ScenarioOverride) {
        let overrides = ScenarioOverride {
            home_price: self.home_price,
            purchase_discount_pct: self.purchase_discount_pct,
            appreciation_pct: self.appreciation_pct,
            expense_vacancy_pct: self.expense_vacancy_pct,
            loan_rate_pct: self.loan_rate_pct,
            rent_income_pct: self.rent_income_pct,
            pct_down: self.pct_down,
            rental_appreciation_pct: self.rental_appreciation_pct,
            years: self.years,
            principal_paydown_pct: self.principal_paydown_pct,
        };
        (self.name.trim().to_string(), overrides)
    }
}

/// Load a scenario catalog from a CSV file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ScenarioCatalog> {
    let path = path.as_ref();
    info!("Loading scenario catalog from {}", path.display());
    load_catalog_from_reader(File::open(path)?)
}

/// Load a scenario catalog from any CSV reader
///
/// Rows are registered in file order, so a repeated name replaces the
/// earlier override while keeping its position.
pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<ScenarioCatalog> {
    let mut reader = Reader::from_reader(reader);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "name") {
        return Err(ProjectionError::invalid("name", "catalog has no `name` column"));
    }
    for header in headers.iter() {
        if header != "name" && !PARAMETER_NAMES.contains(&header) {
            return Err(ProjectionError::UnknownParameter(header.to_string()));
        }
    }

    let mut catalog = ScenarioCatalog::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let (name, overrides) = row.into_entry();
        if name.is_empty() {
            return Err(ProjectionError::invalid("name", "scenario name is blank"));
        }
        catalog.register(name, overrides);
    }

    debug!("Loaded {} scenarios", catalog.len());
    Ok(catalog)
}

/// Load a baseline parameter set from a JSON file
pub fn load_baseline<P: AsRef<Path>>(path: P) -> Result<ScenarioParameters> {
    let path = path.as_ref();
    info!("Loading baseline parameters from {}", path.display());
    let overrides: ScenarioOverride = serde_json::from_reader(File::open(path)?)?;
    Ok(ScenarioParameters::default().apply(&overrides))
}

/// Parse a baseline parameter set from a JSON string
pub fn parse_baseline(json: &str) -> Result<ScenarioParameters> {
    let overrides: ScenarioOverride = serde_json::from_str(json)?;
    Ok(ScenarioParameters::default().apply(&overrides))
}
