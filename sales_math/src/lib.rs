//! # Sales Math
//!
//! Accuracy calculations for comparing forecasted sales against observed sales.
//! This crate works on plain aligned slices; date handling and alignment live
//! in `forecast_eval`.
//!
//! - [`percentage`]: MAPE, sMAPE, masked MAPE and median APE
//! - [`absolute`]: MAE, RMSE and bias

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod absolute;
pub mod percentage;

pub use absolute::{bias, mean_absolute_error, root_mean_squared_error};
pub use percentage::{
    masked_mape, median_absolute_percentage_error, mean_absolute_percentage_error,
    symmetric_mean_absolute_percentage_error, PercentageError,
};

/// Errors that can occur in accuracy calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate denominator: {0}")]
    DegenerateDenominator(String),
}

/// Result type for accuracy math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// How percentage metrics treat points whose denominator is zero
/// (a zero actual for MAPE, a zero actual+forecast sum for sMAPE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenominatorPolicy {
    /// Leave degenerate points out of the mean and count them.
    #[default]
    Skip,
    /// Let any degenerate point turn the metric into `NaN`.
    Propagate,
}

impl std::fmt::Display for DenominatorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenominatorPolicy::Skip => write!(f, "skip"),
            DenominatorPolicy::Propagate => write!(f, "propagate"),
        }
    }
}

/// Check that two aligned slices can be compared point by point
pub(crate) fn check_pair(actual: &[f64], forecast: &[f64]) -> Result<()> {
    if actual.len() != forecast.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual ({}) and forecast ({}) lengths differ",
            actual.len(),
            forecast.len()
        )));
    }

    if actual.is_empty() {
        return Err(MathError::InsufficientData(
            "Need at least 1 aligned point".to_string(),
        ));
    }

    if actual.iter().chain(forecast.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Values must be finite".to_string(),
        ));
    }

    Ok(())
}
