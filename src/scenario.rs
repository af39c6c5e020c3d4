//! Scenario runner for sensitivity comparisons
//!
//! Holds one baseline parameter set, then evaluates an ordered catalog of
//! named overrides against it and assembles a year-by-year comparison table.

use crate::assumptions::{ScenarioOverride, ScenarioParameters};
use crate::error::{ProjectionError, Result};
use crate::projection::growth::round_to;
use crate::projection::{ProjectionConfig, ProjectionEngine, ScenarioResult};
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

/// Ordered list of named overrides
///
/// Registering a name that already exists replaces its override but keeps
/// the position of the first registration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioCatalog {
    entries: Vec<(String, ScenarioOverride)>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline plus one-parameter perturbations
    pub fn default_sensitivity() -> Self {
        let mut catalog = Self::new();
        catalog.register("Default", ScenarioOverride::default());
        catalog.register(
            "No Purchase Discount",
            ScenarioOverride { purchase_discount_pct: Some(0.0), ..Default::default() },
        );
        catalog.register(
            "1.2% Rental Income",
            ScenarioOverride { rent_income_pct: Some(0.012), ..Default::default() },
        );
        catalog.register(
            "7% Appreciation",
            ScenarioOverride { appreciation_pct: Some(0.07), ..Default::default() },
        );
        catalog.register(
            "3% Appreciation",
            ScenarioOverride { appreciation_pct: Some(0.03), ..Default::default() },
        );
        catalog.register(
            "-3% Appreciation",
            ScenarioOverride { appreciation_pct: Some(-0.03), ..Default::default() },
        );
        catalog.register(
            "20% Expense/Vacancy",
            ScenarioOverride { expense_vacancy_pct: Some(0.2), ..Default::default() },
        );
        catalog.register(
            "60% Expense/Vacancy",
            ScenarioOverride { expense_vacancy_pct: Some(0.6), ..Default::default() },
        );
        catalog.register(
            "5% Loan Rate",
            ScenarioOverride { loan_rate_pct: Some(0.05), ..Default::default() },
        );
        catalog.register(
            "9% Loan Rate",
            ScenarioOverride { loan_rate_pct: Some(0.09), ..Default::default() },
        );
        catalog.register(
            "5% Down Payment",
            ScenarioOverride { pct_down: Some(0.05), ..Default::default() },
        );
        catalog.register(
            "5% Down Payment",
            ScenarioOverride { pct_down: Some(0.05), ..Default::default() },
        );
        catalog.register(
            "3% Principal Paydown Pct",
            ScenarioOverride { principal_paydown_pct: Some(0.03), ..Default::default() },
        );
        catalog
    }

    /// Add or replace a named scenario
    pub fn register(&mut self, name: impl Into<String>, overrides: ScenarioOverride) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                debug!("Scenario '{}' registered again; replacing earlier override", name);
                entry.1 = overrides;
            }
            None => self.entries.push((name, overrides)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioOverride> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, overrides)| overrides)
    }

    pub fn entries(&self) -> &[(String, ScenarioOverride)] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ScenarioOverride)> for ScenarioCatalog {
    fn from_iter<I: IntoIterator<Item = (S, ScenarioOverride)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (name, overrides) in iter {
            catalog.register(name, overrides);
        }
        catalog
    }
}

/// Outcome of evaluating one catalog entry
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub parameters: ScenarioParameters,
    pub result: Result<ScenarioResult>,
}

/// Scenario outcomes keyed by name, in catalog order
#[derive(Debug, Default)]
pub struct ScenarioResults {
    outcomes: Vec<ScenarioOutcome>,
}

impl ScenarioResults {
    /// Full outcome for a name, including the resolved parameters
    pub fn outcome(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Result<ScenarioResult>> {
        self.outcome(name).map(|outcome| &outcome.result)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().map(|outcome| outcome.name.as_str())
    }

    /// Successful results only, in catalog order
    pub fn successes(&self) -> impl Iterator<Item = (&str, &ScenarioResult)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(|r| (outcome.name.as_str(), r)))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Pre-configured scenario runner for sensitivity comparisons
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ScenarioParameters::default());
/// let results = runner.run_all(&ScenarioCatalog::default_sensitivity());
/// let table = ComparisonTable::from_results(&results);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Baseline every override is applied to
    baseline: ScenarioParameters,
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the default projection config
    pub fn new(baseline: ScenarioParameters) -> Self {
        Self::with_config(baseline, ProjectionConfig::default())
    }

    pub fn with_config(baseline: ScenarioParameters, config: ProjectionConfig) -> Self {
        Self {
            baseline,
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single scenario against the baseline
    pub fn run(&self, overrides: &ScenarioOverride) -> Result<ScenarioResult> {
        self.engine.run(&self.baseline.apply(overrides))
    }

    /// Run every catalog entry in order
    ///
    /// A failing scenario is recorded as an error and does not affect the others.
    pub fn run_all(&self, catalog: &ScenarioCatalog) -> ScenarioResults {
        let outcomes = catalog
            .entries()
            .iter()
            .map(|(name, overrides)| self.evaluate(name, overrides))
            .collect();
        ScenarioResults { outcomes }
    }

    /// Same as `run_all`, evaluating scenarios in parallel
    pub fn run_all_parallel(&self, catalog: &ScenarioCatalog) -> ScenarioResults {
        let outcomes = catalog
            .entries()
            .par_iter()
            .map(|(name, overrides)| self.evaluate(name, overrides))
            .collect();
        ScenarioResults { outcomes }
    }

    fn evaluate(&self, name: &str, overrides: &ScenarioOverride) -> ScenarioOutcome {
        let parameters = self.baseline.apply(overrides);
        let result = self.engine.run(&parameters);
        match &result {
            Ok(r) => debug!("Scenario '{}': CAGR {:?}", name, r.cagr_pct),
            Err(e) => warn!("Scenario '{}' failed: {}", name, e),
        }
        ScenarioOutcome {
            name: name.to_string(),
            parameters,
            result,
        }
    }

    /// Get reference to the baseline for inspection
    pub fn baseline(&self) -> &ScenarioParameters {
        &self.baseline
    }

    /// Get mutable reference to the baseline for customization
    pub fn baseline_mut(&mut self) -> &mut ScenarioParameters {
        &mut self.baseline
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(ScenarioParameters::default())
    }
}

/// One scenario's row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub scenario: String,
    /// ROI labels, one per year (`"31.2%"`)
    pub roi: Vec<String>,
    /// CAGR in percent rounded to two decimals
    pub cagr_pct: Option<f64>,
    /// Failure message when the scenario or its CAGR could not be evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Scenario-by-year ROI table with a trailing CAGR column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonTable {
    pub columns: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn from_results(results: &ScenarioResults) -> Self {
        let max_years = results
            .successes()
            .map(|(_, r)| r.years.len())
            .max()
            .unwrap_or(0);

        let mut columns: Vec<String> = (1..=max_years).map(|y| format!("Year {}", y)).collect();
        columns.push("CAGR".to_string());

        let rows = results
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(result) => ComparisonRow {
                    scenario: outcome.name.clone(),
                    roi: result.roi_labels(),
                    cagr_pct: result.cagr_pct.map(|cagr| round_to(cagr, 2)),
                    error: result.cagr().err().map(|e| e.to_string()),
                },
                Err(e) => ComparisonRow {
                    scenario: outcome.name.clone(),
                    roi: Vec::new(),
                    cagr_pct: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        Self { columns, rows }
    }

    pub fn row(&self, scenario: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.scenario == scenario)
    }

    /// Number of year columns (excludes the CAGR column)
    pub fn year_columns(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Write the table as CSV; short rows are padded with empty cells
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        let year_columns = self.year_columns();

        let mut header = vec!["Scenario".to_string()];
        header.extend(self.columns.iter().cloned());
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.scenario.clone()];
            for year in 0..year_columns {
                record.push(row.roi.get(year).cloned().unwrap_or_default());
            }
            record.push(match (row.cagr_pct, &row.error) {
                (Some(cagr), _) => format!("{:.2}", cagr),
                (None, Some(error)) => error.clone(),
                (None, None) => String::new(),
            });
            writer.write_record(&record)?;
        }

        writer.flush().map_err(ProjectionError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GrowthRatePolicy;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_catalog_order_and_overwrite() {
        let catalog = ScenarioCatalog::default_sensitivity();
        assert_eq!(catalog.len(), 12);

        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names[0], "Default");
        assert_eq!(names[10], "5% Down Payment");
        assert_eq!(names[11], "3% Principal Paydown Pct");
        assert_eq!(names.iter().filter(|n| **n == "5% Down Payment").count(), 1);
    }

    #[test]
    fn test_later_registration_wins() {
        let catalog: ScenarioCatalog = vec![
            ("Low Down", ScenarioOverride { pct_down: Some(0.10), ..Default::default() }),
            ("Default", ScenarioOverride::default()),
            ("Low Down", ScenarioOverride { pct_down: Some(0.05), ..Default::default() }),
        ]
        .into_iter()
        .collect();

        let runner = ScenarioRunner::default();
        let results = runner.run_all(&catalog);
        assert_eq!(results.len(), 2);

        let names: Vec<&str> = results.names().collect();
        assert_eq!(names, vec!["Low Down", "Default"]);

        let low_down = results.get("Low Down").unwrap().as_ref().unwrap();
        assert_relative_eq!(low_down.down_payment, 20_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_run_all_matches_direct_runs() {
        let runner = ScenarioRunner::default();
        let catalog = ScenarioCatalog::default_sensitivity();
        let results = runner.run_all(&catalog);

        assert_eq!(results.len(), catalog.len());
        for (name, overrides) in catalog.entries() {
            let direct = runner.run(overrides).unwrap();
            let batched = results.get(name).unwrap().as_ref().unwrap();
            assert_eq!(&direct, batched);
        }
    }

    #[test]
    fn test_parallel_preserves_catalog_order() {
        let runner = ScenarioRunner::default();
        let catalog = ScenarioCatalog::default_sensitivity();

        let serial = ComparisonTable::from_results(&runner.run_all(&catalog));
        let parallel = ComparisonTable::from_results(&runner.run_all_parallel(&catalog));
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_sensitivities_move_in_expected_direction() {
        let runner = ScenarioRunner::default();
        let results = runner.run_all(&ScenarioCatalog::default_sensitivity());
        let cagr = |name: &str| results.get(name).unwrap().as_ref().unwrap().cagr().unwrap();

        assert!(cagr("7% Appreciation") > cagr("Default"));
        assert!(cagr("3% Appreciation") < cagr("Default"));
        assert!(cagr("-3% Appreciation") < cagr("3% Appreciation"));
        assert!(cagr("20% Expense/Vacancy") > cagr("60% Expense/Vacancy"));
        assert!(cagr("5% Loan Rate") > cagr("9% Loan Rate"));
        assert!(cagr("1.2% Rental Income") > cagr("Default"));
    }

    #[test]
    fn test_invalid_scenario_does_not_affect_others() {
        let mut catalog = ScenarioCatalog::default_sensitivity();
        catalog.register(
            "Zero Down",
            ScenarioOverride { pct_down: Some(0.0), ..Default::default() },
        );

        let runner = ScenarioRunner::default();
        let results = runner.run_all(&catalog);
        assert!(matches!(
            results.get("Zero Down"),
            Some(Err(ProjectionError::InvalidConfiguration { field: "pct_down", .. }))
        ));
        assert_eq!(results.successes().count(), 12);

        let table = ComparisonTable::from_results(&results);
        let row = table.row("Zero Down").unwrap();
        assert!(row.roi.is_empty());
        assert!(row.cagr_pct.is_none());
        assert!(row.error.as_ref().unwrap().contains("pct_down"));
        assert_eq!(table.row("Default").unwrap().roi.len(), 10);
    }

    #[test]
    fn test_strict_undefined_cagr_keeps_roi_row() {
        let baseline = ScenarioParameters {
            appreciation_pct: -0.5,
            principal_paydown_pct: 0.0,
            years: 4,
            ..Default::default()
        };
        let catalog: ScenarioCatalog = vec![
            ("Wipeout", ScenarioOverride { pct_down: Some(0.05), ..Default::default() }),
            ("Flat", ScenarioOverride { appreciation_pct: Some(0.0), ..Default::default() }),
        ]
        .into_iter()
        .collect();

        let strict = ScenarioRunner::with_config(
            baseline,
            ProjectionConfig { growth_rate_policy: GrowthRatePolicy::Strict },
        );
        let table = ComparisonTable::from_results(&strict.run_all(&catalog));

        let wipeout = table.row("Wipeout").unwrap();
        assert_eq!(wipeout.roi.len(), 4);
        assert!(wipeout.cagr_pct.is_none());
        assert!(wipeout.error.as_ref().unwrap().contains("growth rate undefined"));

        let flat = table.row("Flat").unwrap();
        assert!(flat.cagr_pct.is_some());
        assert!(flat.error.is_none());

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let wipeout_line = text.lines().find(|l| l.starts_with("Wipeout")).unwrap();
        assert!(wipeout_line.contains("growth rate undefined"));
        assert_eq!(wipeout_line.split(',').filter(|c| c.ends_with('%')).count(), 4);
    }

    #[test]
    fn test_outcome_carries_resolved_parameters() {
        let runner = ScenarioRunner::default();
        let results = runner.run_all(&ScenarioCatalog::default_sensitivity());

        let outcome = results.outcome("9% Loan Rate").unwrap();
        assert_eq!(outcome.parameters.loan_rate_pct, 0.09);
        assert_eq!(outcome.parameters.pct_down, runner.baseline().pct_down);
        assert!(results.outcome("Missing").is_none());
    }

    #[test]
    fn test_comparison_table_layout() {
        let runner = ScenarioRunner::default();
        let table = ComparisonTable::from_results(&runner.run_all(&ScenarioCatalog::default_sensitivity()));

        assert_eq!(table.columns.len(), 11);
        assert_eq!(table.columns[0], "Year 1");
        assert_eq!(table.columns[9], "Year 10");
        assert_eq!(table.columns[10], "CAGR");
        assert_eq!(table.rows.len(), 12);

        let default = table.row("Default").unwrap();
        assert_eq!(default.roi[0], "31.2%");
        assert_eq!(default.roi[1], "34.4%");

        let cagr = default.cagr_pct.unwrap();
        assert_eq!(cagr, round_to(cagr, 2));
    }

    #[test]
    fn test_table_pads_shorter_horizons() {
        let catalog: ScenarioCatalog = vec![
            ("Default", ScenarioOverride::default()),
            ("Short", ScenarioOverride { years: Some(3), ..Default::default() }),
        ]
        .into_iter()
        .collect();
        let table = ComparisonTable::from_results(&ScenarioRunner::default().run_all(&catalog));
        assert_eq!(table.year_columns(), 10);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Scenario,Year 1,"));
        assert!(lines[0].ends_with("Year 10,CAGR"));
        assert!(lines[1].starts_with("Default,31.2%,34.4%,"));
        // 3 ROI cells, 7 empty cells, then CAGR
        let short: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(short.len(), 12);
        assert_eq!(short[1], "31.2%");
        assert!(short[4..11].iter().all(|cell| cell.is_empty()));
        assert!(!short[11].ends_with('%'));
    }

    #[test]
    fn test_baseline_mut_changes_every_scenario() {
        let mut runner = ScenarioRunner::default();
        runner.baseline_mut().years = 5;

        let results = runner.run_all(&ScenarioCatalog::default_sensitivity());
        assert!(results.successes().all(|(_, r)| r.years.len() == 5));
    }
}
