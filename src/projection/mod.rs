//! Projection engine for single-scenario rental return projections

mod state;
mod engine;
mod cashflows;
pub mod growth;

pub use state::SimulationState;
pub use engine::{ProjectionEngine, ProjectionConfig};
pub use cashflows::{YearResult, ScenarioResult, ScenarioSummary};
pub use growth::{compound_annual_growth_rate, GrowthRatePolicy};
