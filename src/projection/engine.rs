//! Core projection engine for annual rental property returns

use super::cashflows::{ScenarioResult, YearResult};
use super::growth::{compound_annual_growth_rate, GrowthRatePolicy};
use super::state::SimulationState;
use crate::assumptions::ScenarioParameters;
use crate::error::{ProjectionError, Result};
use log::{debug, trace, warn};

/// Configuration for a projection run
#[derive(Debug, Clone, Default)]
pub struct ProjectionConfig {
    /// CAGR reporting when the ending equity position is negative
    pub growth_rate_policy: GrowthRatePolicy,
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Run the year-by-year simulation for one parameter set
    ///
    /// Parameters are validated first; invalid input never produces a
    /// partial result. Inputs that pass validation but overflow `f64`
    /// fail with `NumericOverflow`. An undefined CAGR under the strict
    /// policy keeps the yearly rows and leaves `cagr_pct` empty.
    pub fn run(&self, params: &ScenarioParameters) -> Result<ScenarioResult> {
        params.validate()?;

        let purchase_price = params.purchase_price();
        let down_payment = params.down_payment();
        let mut result = ScenarioResult::new(purchase_price, down_payment, params.loan_amount());
        let mut state = SimulationState::from_parameters(params);

        for _year in 1..=params.years {
            state.advance_year();

            let row = self.calculate_year(params, &mut state);
            if !row.roi_pct.is_finite() {
                return Err(ProjectionError::NumericOverflow { year: row.year, quantity: "ROI" });
            }
            trace!("Year {}: ROI {:.4}%", row.year, row.roi_pct);
            result.add_year(row);
        }

        result.ending_value = state.equity_position();
        if !result.ending_value.is_finite() {
            return Err(ProjectionError::NumericOverflow {
                year: params.years,
                quantity: "ending value",
            });
        }

        let cagr = compound_annual_growth_rate(
            down_payment,
            result.ending_value,
            params.years,
            self.config.growth_rate_policy,
        );
        result.cagr_pct = match cagr {
            Ok(cagr) if !cagr.is_finite() => {
                return Err(ProjectionError::NumericOverflow { year: params.years, quantity: "CAGR" });
            }
            Ok(cagr) => Some(cagr),
            Err(e @ ProjectionError::UndefinedGrowthRate { .. }) => {
                warn!("{}; keeping yearly results without CAGR", e);
                None
            }
            Err(e) => return Err(e),
        };

        debug!(
            "Projected {} years: ending value {:.2}, CAGR {:?}",
            params.years, result.ending_value, result.cagr_pct
        );

        Ok(result)
    }

    /// Calculate returns for the current year, then roll the state forward
    fn calculate_year(&self, params: &ScenarioParameters, state: &mut SimulationState) -> YearResult {
        let mut row = YearResult::new(state.year);

        // Set BOP values
        row.bop_home_value = state.current_home_value;
        row.bop_annual_rent = state.current_annual_rent;
        row.bop_remaining_principal = state.remaining_principal;

        // Gains, all from the beginning-of-year position
        row.home_appreciation = state.current_home_value * params.appreciation_pct;
        // Flat paydown on the original price, independent of the remaining balance
        row.principal_paydown = params.purchase_price() * params.principal_paydown_pct;
        row.gross_rental_cash_flow = state.current_annual_rent * (1.0 - params.expense_vacancy_pct);

        row.interest_cost = state.remaining_principal * params.loan_rate_pct;
        row.net_rental_cash_flow = row.gross_rental_cash_flow - row.interest_cost;

        row.total_return = row.home_appreciation + row.principal_paydown + row.net_rental_cash_flow;
        row.roi_pct = row.total_return / params.down_payment() * 100.0;

        // Update state for next year
        state.apply_year_end(params, row.principal_paydown, row.net_rental_cash_flow);
        row.cumulative_net_cash_flow = state.cumulative_net_cash_flow;

        row
    }
}
