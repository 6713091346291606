//! Error types for the forecast_eval crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the forecast_eval crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Requested store key has no series in a lookup store
    #[error("No {store} series for store key '{key}'")]
    NotFound {
        /// Which store missed ("forecast" or "actual sales")
        store: &'static str,
        /// The requested store key
        key: String,
    },

    /// Actual and forecast series share no dates
    #[error(
        "No overlapping dates between {actual_points} actual and {forecast_points} forecast points"
    )]
    AlignmentEmpty {
        actual_points: usize,
        forecast_points: usize,
    },

    /// Error from accuracy calculations
    #[error("Math error: {0}")]
    MathError(#[from] sales_math::MathError),

    /// Error from configuration loading or validation
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
