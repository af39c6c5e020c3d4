//! Compound annual growth rate (CAGR) calculation
//!
//! Used to summarize a projection's equity position against the initial
//! down payment.

use crate::error::{ProjectionError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// How to report growth when the ending value is negative
///
/// A negative ending/beginning ratio has no real n-th root for even `n`,
/// so one of these must be chosen explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthRatePolicy {
    /// Take the root of the ratio's magnitude and negate the root, not the
    /// final rate: `(-(|r|^(1/n)) - 1) * 100`.
    ///
    /// Negating the finished rate instead, `-((|r|^(1/n) - 1) * 100)`, would
    /// report a small negative ending value (|r| < 1) as positive growth.
    /// Negating the root keeps every negative ending value below -100%,
    /// i.e. worse than losing the whole down payment.
    #[default]
    SignedRoot,
    /// Fail with `UndefinedGrowthRate`
    Strict,
}

/// Calculate CAGR as a percentage (e.g. 5.0 for 5%)
///
/// # Arguments
/// * `beginning_value` - Initial stake (down payment)
/// * `ending_value` - Equity position after `years`
/// * `years` - Number of compounding years
///
/// # Returns
/// * `0.0` when `beginning_value <= 0` or `years == 0`
/// * The signed-root rate or `UndefinedGrowthRate` for a negative ending value,
///   depending on `policy`
pub fn compound_annual_growth_rate(
    beginning_value: f64,
    ending_value: f64,
    years: u32,
    policy: GrowthRatePolicy,
) -> Result<f64> {
    if beginning_value <= 0.0 || years == 0 {
        return Ok(0.0);
    }

    let ratio = ending_value / beginning_value;
    let exponent = 1.0 / years as f64;

    if ratio >= 0.0 {
        return Ok((ratio.powf(exponent) - 1.0) * 100.0);
    }

    match policy {
        GrowthRatePolicy::SignedRoot => {
            warn!(
                "Ending value {:.2} is negative; reporting signed-root growth rate",
                ending_value
            );
            Ok((-ratio.abs().powf(exponent) - 1.0) * 100.0)
        }
        GrowthRatePolicy::Strict => Err(ProjectionError::UndefinedGrowthRate {
            ending_value,
            beginning_value,
        }),
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
