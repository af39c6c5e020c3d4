//! Rental Projection - Multi-year return simulator for leveraged rental property
//!
//! This library provides:
//! - Year-by-year projection of appreciation, principal paydown, and net rental cash flow
//! - Annual ROI against the down payment and CAGR of the equity position
//! - Named scenario catalogs (baseline plus overrides) loaded from code or CSV
//! - Side-by-side sensitivity tables, evaluated serially or in parallel

pub mod error;
pub mod assumptions;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use assumptions::{ScenarioParameters, ScenarioOverride};
pub use projection::{ProjectionEngine, ProjectionConfig, GrowthRatePolicy, ScenarioResult, YearResult};
pub use scenario::{ScenarioRunner, ScenarioCatalog, ScenarioResults, ComparisonTable};
