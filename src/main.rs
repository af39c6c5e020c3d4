//! Rental Projection CLI
//!
//! Command-line interface for running scenario comparisons

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use rental_projection::{
    assumptions::{load_baseline, load_catalog},
    ComparisonTable, GrowthRatePolicy, ProjectionConfig, ScenarioCatalog, ScenarioOverride,
    ScenarioParameters, ScenarioResult, ScenarioRunner,
};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rental_projection")]
#[command(about = "Annual ROI and CAGR projections for leveraged rental property")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with baseline parameters (missing keys use defaults)
    #[arg(long, global = true)]
    baseline: Option<PathBuf>,

    /// Leave the CAGR undefined when ending equity is negative instead of reporting a signed-root rate
    #[arg(long, global = true)]
    strict_cagr: bool,

    #[command(flatten)]
    overrides: BaselineOverrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every scenario in a catalog side by side
    Compare {
        /// Scenario catalog CSV (defaults to the built-in sensitivity catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Evaluate scenarios in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Show the year-by-year breakdown for one scenario
    Detail {
        /// Scenario name
        scenario: String,

        /// Scenario catalog CSV (defaults to the built-in sensitivity catalog)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// Per-field baseline overrides, applied after the baseline file
#[derive(Args)]
struct BaselineOverrides {
    #[arg(long, global = true)]
    home_price: Option<f64>,
    #[arg(long, global = true)]
    purchase_discount_pct: Option<f64>,
    #[arg(long, global = true)]
    appreciation_pct: Option<f64>,
    #[arg(long, global = true)]
    expense_vacancy_pct: Option<f64>,
    #[arg(long, global = true)]
    loan_rate_pct: Option<f64>,
    #[arg(long, global = true)]
    rent_income_pct: Option<f64>,
    #[arg(long, global = true)]
    pct_down: Option<f64>,
    #[arg(long, global = true)]
    rental_appreciation_pct: Option<f64>,
    #[arg(long, global = true)]
    years: Option<u32>,
    #[arg(long, global = true)]
    principal_paydown_pct: Option<f64>,
}

impl BaselineOverrides {
    fn to_override(&self) -> ScenarioOverride {
        ScenarioOverride {
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
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    let file_baseline = match &cli.baseline {
        Some(path) => load_baseline(path)
            .with_context(|| format!("Failed to load baseline from {}", path.display()))?,
        None => ScenarioParameters::default(),
    };
    let baseline = file_baseline.apply(&cli.overrides.to_override());

    let config = ProjectionConfig {
        growth_rate_policy: if cli.strict_cagr {
            GrowthRatePolicy::Strict
        } else {
            GrowthRatePolicy::SignedRoot
        },
    };
    let runner = ScenarioRunner::with_config(baseline, config);

    match cli.command {
        Commands::Compare { catalog, format, parallel } => {
            let catalog = resolve_catalog(catalog.as_ref())?;
            let results = if parallel {
                runner.run_all_parallel(&catalog)
            } else {
                runner.run_all(&catalog)
            };
            let table = ComparisonTable::from_results(&results);

            match format {
                OutputFormat::Table => print_table(&table),
                OutputFormat::Csv => table
                    .write_csv(io::stdout().lock())
                    .context("Failed to write CSV")?,
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
            }
        }
        Commands::Detail { scenario, catalog, format } => {
            let catalog = resolve_catalog(catalog.as_ref())?;
            let overrides = *catalog
                .get(&scenario)
                .ok_or_else(|| anyhow!("Scenario '{}' not found in catalog", scenario))?;
            let single: ScenarioCatalog = std::iter::once((scenario.as_str(), overrides)).collect();
            let results = runner.run_all(&single);
            let outcome = results
                .outcome(&scenario)
                .ok_or_else(|| anyhow!("Scenario '{}' was not evaluated", scenario))?;
            let result = outcome
                .result
                .as_ref()
                .map_err(|e| anyhow!("Scenario '{}' failed: {}", scenario, e))?;

            match format {
                OutputFormat::Table => print_detail(&scenario, &outcome.parameters, result),
                OutputFormat::Csv => write_detail_csv(result)?,
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
            }
        }
    }

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}

fn resolve_catalog(path: Option<&PathBuf>) -> anyhow::Result<ScenarioCatalog> {
    match path {
        Some(path) => load_catalog(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Ok(ScenarioCatalog::default_sensitivity()),
    }
}

fn print_table(table: &ComparisonTable) {
    let name_width = table
        .rows
        .iter()
        .map(|row| row.scenario.len())
        .max()
        .unwrap_or(0)
        .max("Scenario".len());
    let year_columns = table.year_columns();

    println!("\nAnnual ROI (%) and CAGR (%):");
    print!("{:<width$}", "Scenario", width = name_width);
    for column in &table.columns {
        print!(" {:>8}", column);
    }
    println!();
    println!("{}", "-".repeat(name_width + 9 * table.columns.len()));

    for row in &table.rows {
        print!("{:<width$}", row.scenario, width = name_width);
        if row.roi.is_empty() {
            if let Some(error) = &row.error {
                println!("  error: {}", error);
                continue;
            }
        }
        for year in 0..year_columns {
            print!(" {:>8}", row.roi.get(year).map(String::as_str).unwrap_or(""));
        }
        match (row.cagr_pct, &row.error) {
            (Some(cagr), _) => println!(" {:>8.2}", cagr),
            (None, Some(error)) => println!("  error: {}", error),
            (None, None) => println!(),
        }
    }
}

fn print_detail(name: &str, params: &ScenarioParameters, result: &ScenarioResult) {
    println!("Scenario: {}", name);
    println!("  Home Price:           ${:.2}", params.home_price);
    println!("  Purchase Discount:    {:.2}%", params.purchase_discount_pct * 100.0);
    println!("  Appreciation:         {:.2}%", params.appreciation_pct * 100.0);
    println!("  Expense/Vacancy:      {:.2}%", params.expense_vacancy_pct * 100.0);
    println!("  Loan Rate:            {:.2}%", params.loan_rate_pct * 100.0);
    println!("  Monthly Rent:         {:.2}% of price", params.rent_income_pct * 100.0);
    println!("  Down Payment:         {:.2}%", params.pct_down * 100.0);
    println!("  Rent Growth:          {:.2}%", params.rental_appreciation_pct * 100.0);
    println!("  Principal Paydown:    {:.2}% of price per year", params.principal_paydown_pct * 100.0);
    println!("  Years:                {}", params.years);
    println!();
    println!("  Purchase Price: ${:.2}", result.purchase_price);
    println!("  Down Payment:   ${:.2}", result.down_payment);
    println!("  Loan Amount:    ${:.2}", result.loan_amount);
    println!();

    println!("{:>4} {:>14} {:>12} {:>14} {:>12} {:>10} {:>12} {:>12} {:>12} {:>8}",
        "Year", "BOP Value", "BOP Rent", "BOP Principal", "Apprec", "Paydown", "Interest", "Net CF", "Total", "ROI");
    println!("{}", "-".repeat(120));

    for row in &result.years {
        println!("{:>4} {:>14.2} {:>12.2} {:>14.2} {:>12.2} {:>10.2} {:>12.2} {:>12.2} {:>12.2} {:>8}",
            row.year,
            row.bop_home_value,
            row.bop_annual_rent,
            row.bop_remaining_principal,
            row.home_appreciation,
            row.principal_paydown,
            row.interest_cost,
            row.net_rental_cash_flow,
            row.total_return,
            row.roi_label(),
        );
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Appreciation:   ${:.2}", summary.total_appreciation);
    println!("  Total Paydown:        ${:.2}", summary.total_principal_paydown);
    println!("  Total Net Cash Flow:  ${:.2}", summary.total_net_cash_flow);
    println!("  Final Home Value:     ${:.2}", summary.final_home_value);
    println!("  Final Principal:      ${:.2}", summary.final_remaining_principal);
    println!("  Ending Value:         ${:.2}", summary.ending_value);
    println!("  Average ROI:          {:.1}%", summary.average_roi_pct);
    match result.cagr() {
        Ok(cagr) => println!("  CAGR:                 {:.2}%", cagr),
        Err(e) => println!("  CAGR:                 undefined ({})", e),
    }
}

fn write_detail_csv(result: &ScenarioResult) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for row in &result.years {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
