//! # Forecast Eval
//!
//! Evaluate precomputed store sales forecasts against actual sales history.
//!
//! ## Features
//!
//! - Actual and forecast series with validated, date-ordered points
//! - Lookup stores behind the [`ForecastStore`] and [`ActualSalesStore`] traits
//! - Exact-date inner join of actual and forecast series
//! - MAPE, sMAPE and MAPE excluding known spike days, plus MdAPE, MAE, RMSE and bias
//! - Optional second-horizon outlook per store
//! - Daily sales derived from raw transaction rows
//! - CSV and JSON store files, TOML configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_eval::{DataLoader, EvalConfig, Evaluator};
//!
//! let forecasts = DataLoader::forecasts_from_path("forecasts.json")?;
//! let actuals = DataLoader::actuals_from_path("actuals.csv")?;
//!
//! let evaluator = Evaluator::new(forecasts, actuals, EvalConfig::default())?;
//! let evaluation = evaluator.evaluate("store_01")?;
//! println!("{}", evaluation);
//! # Ok::<(), forecast_eval::ForecastError>(())
//! ```

pub mod align;
pub mod config;
pub mod data;
pub mod error;
pub mod etl;
pub mod evaluator;
pub mod metrics;
pub mod report;
pub mod store;
pub mod synthetic;
pub mod utils;

// Re-export commonly used types
pub use crate::align::{align, AlignedRow, AlignedTable};
pub use crate::config::{DashboardConfig, EvalConfig, ExclusionSet, SourceConfig};
pub use crate::data::{ActualSeries, DataLoader, ForecastPoint, ForecastSeries, SalesPoint};
pub use crate::error::{ForecastError, Result};
pub use crate::etl::EtlConfig;
pub use crate::evaluator::{Evaluation, Evaluator};
pub use crate::metrics::AccuracyReport;
pub use crate::store::{ActualSalesStore, ActualSalesTable, ForecastStore, ForecastTable};
pub use sales_math::{DenominatorPolicy, PercentageError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
