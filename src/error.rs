//! Error types for projection and scenario loading

/// Errors raised while validating, projecting, or loading scenarios
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("growth rate undefined: ending value {ending_value:.2} is negative against beginning value {beginning_value:.2}")]
    UndefinedGrowthRate { ending_value: f64, beginning_value: f64 },

    #[error("{quantity} is not finite in year {year}; inputs overflow the projection")]
    NumericOverflow { year: u32, quantity: &'static str },

    #[error("unknown scenario parameter: {0}")]
    UnknownParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectionError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
