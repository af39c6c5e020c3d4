//! Purchase, financing, and growth assumptions for a rental property projection

pub mod loader;

pub use loader::{load_baseline, load_catalog, load_catalog_from_reader, parse_baseline};

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};

/// Default nominal asking price
pub const DEFAULT_HOME_PRICE: f64 = 500_000.0;
/// Default horizon in years
pub const DEFAULT_YEARS: u32 = 10;
/// Longest accepted horizon
pub const MAX_YEARS: u32 = 1000;

/// Column/key names accepted by the catalog and baseline loaders
pub const PARAMETER_NAMES: [&str; 10] = [
    "home_price",
    "purchase_discount_pct",
    "appreciation_pct",
    "expense_vacancy_pct",
    "loan_rate_pct",
    "rent_income_pct",
    "pct_down",
    "rental_appreciation_pct",
    "years",
    "principal_paydown_pct",
];

/// Full parameter set for one projection run
///
/// All percentages are fractions (0.05 = 5%). `rent_income_pct` is a
/// monthly fraction of purchase price and is annualized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Nominal asking price before discount
    pub home_price: f64,

    /// Reduction applied to the asking price to get the purchase price
    pub purchase_discount_pct: f64,

    /// Annual home value growth (may be negative)
    pub appreciation_pct: f64,

    /// Share of gross rent lost to expenses and vacancy
    pub expense_vacancy_pct: f64,

    /// Annual interest rate on remaining principal
    pub loan_rate_pct: f64,

    /// Monthly gross rent as a fraction of purchase price
    pub rent_income_pct: f64,

    /// Down payment share of purchase price
    pub pct_down: f64,

    /// Annual growth of gross rent
    pub rental_appreciation_pct: f64,

    /// Simulation horizon
    pub years: u32,

    /// Flat fraction of the original purchase price paid down each year
    pub principal_paydown_pct: f64,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            home_price: DEFAULT_HOME_PRICE,
            purchase_discount_pct: 0.2,
            appreciation_pct: 0.05,
            expense_vacancy_pct: 0.4,
            loan_rate_pct: 0.0753,
            rent_income_pct: 0.008,
            pct_down: 0.2,
            rental_appreciation_pct: 0.05,
            years: DEFAULT_YEARS,
            principal_paydown_pct: 0.015,
        }
    }
}

impl ScenarioParameters {
    /// Price actually paid after the purchase discount
    pub fn purchase_price(&self) -> f64 {
        self.home_price * (1.0 - self.purchase_discount_pct)
    }

    pub fn down_payment(&self) -> f64 {
        self.purchase_price() * self.pct_down
    }

    pub fn loan_amount(&self) -> f64 {
        self.purchase_price() * (1.0 - self.pct_down)
    }

    /// First-year gross rent (monthly fraction annualized)
    pub fn initial_annual_rent(&self) -> f64 {
        self.purchase_price() * self.rent_income_pct * 12.0
    }

    /// Check every field against its accepted domain
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("home_price", self.home_price),
            ("purchase_discount_pct", self.purchase_discount_pct),
            ("appreciation_pct", self.appreciation_pct),
            ("expense_vacancy_pct", self.expense_vacancy_pct),
            ("loan_rate_pct", self.loan_rate_pct),
            ("rent_income_pct", self.rent_income_pct),
            ("pct_down", self.pct_down),
            ("rental_appreciation_pct", self.rental_appreciation_pct),
            ("principal_paydown_pct", self.principal_paydown_pct),
        ];
        for (field, value) in fractions {
            if !value.is_finite() {
                return Err(ProjectionError::invalid(field, format!("{value} is not finite")));
            }
        }

        if self.home_price <= 0.0 {
            return Err(ProjectionError::invalid("home_price", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.purchase_discount_pct) {
            return Err(ProjectionError::invalid("purchase_discount_pct", "must be in [0, 1)"));
        }
        if self.appreciation_pct <= -1.0 {
            return Err(ProjectionError::invalid("appreciation_pct", "must be greater than -1"));
        }
        if !(0.0..1.0).contains(&self.expense_vacancy_pct) {
            return Err(ProjectionError::invalid("expense_vacancy_pct", "must be in [0, 1)"));
        }
        if self.loan_rate_pct < 0.0 {
            return Err(ProjectionError::invalid("loan_rate_pct", "must not be negative"));
        }
        if self.rent_income_pct <= 0.0 {
            return Err(ProjectionError::invalid("rent_income_pct", "must be positive"));
        }
        if self.pct_down <= 0.0 || self.pct_down > 1.0 {
            return Err(ProjectionError::invalid("pct_down", "must be in (0, 1]"));
        }
        if self.rental_appreciation_pct <= -1.0 {
            return Err(ProjectionError::invalid(
                "rental_appreciation_pct",
                "must be greater than -1",
            ));
        }
        if self.principal_paydown_pct < 0.0 {
            return Err(ProjectionError::invalid("principal_paydown_pct", "must not be negative"));
        }
        if self.years < 1 {
            return Err(ProjectionError::invalid("years", "must be at least 1"));
        }
        if self.years > MAX_YEARS {
            return Err(ProjectionError::invalid(
                "years",
                format!("must be at most {MAX_YEARS}"),
            ));
        }

        Ok(())
    }

    /// Return a copy with the override's fields replaced
    pub fn apply(&self, overrides: &ScenarioOverride) -> Self {
        Self {
            home_price: overrides.home_price.unwrap_or(self.home_price),
            purchase_discount_pct: overrides
                .purchase_discount_pct
                .unwrap_or(self.purchase_discount_pct),
            appreciation_pct: overrides.appreciation_pct.unwrap_or(self.appreciation_pct),
            expense_vacancy_pct: overrides
                .expense_vacancy_pct
                .unwrap_or(self.expense_vacancy_pct),
            loan_rate_pct: overrides.loan_rate_pct.unwrap_or(self.loan_rate_pct),
            rent_income_pct: overrides.rent_income_pct.unwrap_or(self.rent_income_pct),
            pct_down: overrides.pct_down.unwrap_or(self.pct_down),
            rental_appreciation_pct: overrides
                .rental_appreciation_pct
                .unwrap_or(self.rental_appreciation_pct),
            years: overrides.years.unwrap_or(self.years),
            principal_paydown_pct: overrides
                .principal_paydown_pct
                .unwrap_or(self.principal_paydown_pct),
        }
    }
}

/// Partial parameter set; `None` keeps the baseline value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_discount_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appreciation_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_vacancy_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_rate_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_income_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_down: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_appreciation_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_paydown_pct: Option<f64>,
}

impl ScenarioOverride {
    /// True when no field is overridden (the baseline itself)
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
