//! Simulation state tracking for a single scenario run

use crate::assumptions::ScenarioParameters;

/// Running position of the investment, overwritten once per simulated year
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current simulation year (1-indexed once advanced; 0 before the first year)
    pub year: u32,

    /// Home value at the beginning of the current year
    pub current_home_value: f64,

    /// Gross annual rent for the current year
    pub current_annual_rent: f64,

    /// Loan balance; not clamped at zero
    pub remaining_principal: f64,

    /// Sum of net rental cash flow over completed years
    pub cumulative_net_cash_flow: f64,
}

impl SimulationState {
    /// Initialize state at purchase
    pub fn from_parameters(params: &ScenarioParameters) -> Self {
        Self {
            year: 0,
            current_home_value: params.purchase_price(),
            current_annual_rent: params.initial_annual_rent(),
            remaining_principal: params.loan_amount(),
            cumulative_net_cash_flow: 0.0,
        }
    }

    /// Move to the next simulation year
    pub fn advance_year(&mut self) {
        self.year += 1;
    }

    /// Roll the position forward after a year's returns have been recorded
    pub fn apply_year_end(
        &mut self,
        params: &ScenarioParameters,
        principal_paydown: f64,
        net_rental_cash_flow: f64,
    ) {
        self.current_home_value *= 1.0 + params.appreciation_pct;
        self.current_annual_rent *= 1.0 + params.rental_appreciation_pct;
        self.remaining_principal -= principal_paydown;
        self.cumulative_net_cash_flow += net_rental_cash_flow;
    }

    /// Home equity plus accumulated net cash flow
    pub fn equity_position(&self) -> f64 {
        self.current_home_value - self.remaining_principal + self.cumulative_net_cash_flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_state() {
        let params = ScenarioParameters::default();
        let state = SimulationState::from_parameters(&params);

        assert_eq!(state.year, 0);
        assert_relative_eq!(state.current_home_value, 400_000.0);
        assert_relative_eq!(state.current_annual_rent, 38_400.0, epsilon = 1e-9);
        assert_relative_eq!(state.remaining_principal, 320_000.0);
        assert_eq!(state.cumulative_net_cash_flow, 0.0);

        // Equity at purchase equals the down payment
        assert_relative_eq!(state.equity_position(), params.down_payment());
    }

    #[test]
    fn test_year_end_roll_forward() {
        let params = ScenarioParameters::default();
        let mut state = SimulationState::from_parameters(&params);

        state.advance_year();
        state.apply_year_end(&params, 6_000.0, -1_056.0);

        assert_eq!(state.year, 1);
        assert_relative_eq!(state.current_home_value, 420_000.0, epsilon = 1e-9);
        assert_relative_eq!(state.current_annual_rent, 40_320.0, epsilon = 1e-9);
        assert_relative_eq!(state.remaining_principal, 314_000.0);
        assert_relative_eq!(state.cumulative_net_cash_flow, -1_056.0);
    }

    #[test]
    fn test_principal_can_go_negative() {
        let params = ScenarioParameters::default();
        let mut state = SimulationState::from_parameters(&params);
        state.remaining_principal = 1_000.0;

        state.apply_year_end(&params, 6_000.0, 0.0);
        assert_relative_eq!(state.remaining_principal, -5_000.0);
    }
}
