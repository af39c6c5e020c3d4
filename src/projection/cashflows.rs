//! Per-year output structures for projections

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};

/// A single simulated year of returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearResult {
    /// Simulation year (1-indexed)
    pub year: u32,

    // Beginning-of-year position
    pub bop_home_value: f64,
    pub bop_annual_rent: f64,
    pub bop_remaining_principal: f64,

    // Gains
    pub home_appreciation: f64,
    pub principal_paydown: f64,
    pub gross_rental_cash_flow: f64,
    pub interest_cost: f64,
    pub net_rental_cash_flow: f64,

    // Summary
    pub total_return: f64,
    pub roi_pct: f64,
    pub cumulative_net_cash_flow: f64,
}

impl YearResult {
    /// Create a new year row with zeroed amounts
    pub fn new(year: u32) -> Self {
        Self {
            year,
            bop_home_value: 0.0,
            bop_annual_rent: 0.0,
            bop_remaining_principal: 0.0,
            home_appreciation: 0.0,
            principal_paydown: 0.0,
            gross_rental_cash_flow: 0.0,
            interest_cost: 0.0,
            net_rental_cash_flow: 0.0,
            total_return: 0.0,
            roi_pct: 0.0,
            cumulative_net_cash_flow: 0.0,
        }
    }

    /// ROI with one decimal place and a trailing `%`, e.g. `"31.2%"`
    pub fn roi_label(&self) -> String {
        format!("{:.1}%", self.roi_pct)
    }
}

/// Complete projection result for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Yearly rows, one per simulated year
    pub years: Vec<YearResult>,

    pub purchase_price: f64,
    pub down_payment: f64,
    pub loan_amount: f64,

    /// Home equity plus accumulated net cash flow after the last year
    pub ending_value: f64,

    /// Compound annual growth of the equity position, in percent;
    /// `None` when the growth rate is undefined under the strict policy
    pub cagr_pct: Option<f64>,
}

impl ScenarioResult {
    pub fn new(purchase_price: f64, down_payment: f64, loan_amount: f64) -> Self {
        Self {
            years: Vec::new(),
            purchase_price,
            down_payment,
            loan_amount,
            ending_value: 0.0,
            cagr_pct: None,
        }
    }

    /// Add a year row
    pub fn add_year(&mut self, row: YearResult) {
        self.years.push(row);
    }

    /// CAGR in percent, or the reason it is undefined
    pub fn cagr(&self) -> Result<f64> {
        self.cagr_pct.ok_or(ProjectionError::UndefinedGrowthRate {
            ending_value: self.ending_value,
            beginning_value: self.down_payment,
        })
    }

    /// Raw ROI percentages in year order
    pub fn roi_pcts(&self) -> Vec<f64> {
        self.years.iter().map(|r| r.roi_pct).collect()
    }

    /// Formatted ROI labels in year order
    pub fn roi_labels(&self) -> Vec<String> {
        self.years.iter().map(YearResult::roi_label).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScenarioSummary {
        let total_appreciation: f64 = self.years.iter().map(|r| r.home_appreciation).sum();
        let total_principal_paydown: f64 = self.years.iter().map(|r| r.principal_paydown).sum();
        let total_net_cash_flow: f64 = self.years.iter().map(|r| r.net_rental_cash_flow).sum();
        let total_return: f64 = self.years.iter().map(|r| r.total_return).sum();

        let average_roi_pct = if self.years.is_empty() {
            0.0
        } else {
            self.years.iter().map(|r| r.roi_pct).sum::<f64>() / self.years.len() as f64
        };

        // End-of-horizon balances are the last row's BOP values rolled forward
        let (final_home_value, final_remaining_principal) = self
            .years
            .last()
            .map(|r| {
                (
                    r.bop_home_value + r.home_appreciation,
                    r.bop_remaining_principal - r.principal_paydown,
                )
            })
            .unwrap_or((self.purchase_price, self.loan_amount));

        ScenarioSummary {
            total_years: self.years.len() as u32,
            total_appreciation,
            total_principal_paydown,
            total_net_cash_flow,
            total_return,
            average_roi_pct,
            final_home_value,
            final_remaining_principal,
            ending_value: self.ending_value,
            cagr_pct: self.cagr_pct,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub total_years: u32,
    pub total_appreciation: f64,
    pub total_principal_paydown: f64,
    pub total_net_cash_flow: f64,
    pub total_return: f64,
    pub average_roi_pct: f64,
    pub final_home_value: f64,
    pub final_remaining_principal: f64,
    pub ending_value: f64,
    pub cagr_pct: Option<f64>,
}
