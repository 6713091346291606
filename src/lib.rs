//! # Coop Forecast
//!
//! `coop_forecast` bundles the store forecast evaluation crates:
//!
//! - [`eval`]: series, stores, alignment, the evaluator and reporting
//! - [`math`]: slice-level accuracy metrics
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use coop_forecast::eval::{
//!     ActualSalesTable, ActualSeries, EvalConfig, Evaluator, ForecastPoint, ForecastSeries,
//!     ForecastTable,
//! };
//!
//! let dates: Vec<NaiveDate> = (1..=3)
//!     .map(|d| NaiveDate::from_ymd_opt(2023, 10, d).unwrap())
//!     .collect();
//!
//! let mut actuals = ActualSalesTable::new();
//! actuals.insert(
//!     "store_01",
//!     ActualSeries::from_parts(dates.clone(), vec![100.0, 120.0, 80.0]).unwrap(),
//! );
//!
//! let mut forecasts = ForecastTable::new();
//! let points = dates
//!     .iter()
//!     .zip([110.0, 120.0, 100.0])
//!     .map(|(&d, v)| ForecastPoint::new(d, v))
//!     .collect();
//! forecasts.insert("store_01", ForecastSeries::new(points).unwrap());
//!
//! let evaluator = Evaluator::new(forecasts, actuals, EvalConfig::default()).unwrap();
//! let evaluation = evaluator.evaluate("store_01").unwrap();
//! assert_eq!(format!("{:.2}", evaluation.accuracy.mape.value), "11.67");
//! ```

pub use forecast_eval as eval;
pub use sales_math as math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_share_policy_type() {
        let policy: eval::DenominatorPolicy = math::DenominatorPolicy::Propagate;
        assert_eq!(policy.to_string(), "propagate");
    }

    #[test]
    fn test_version_constant() {
        assert!(!eval::VERSION.is_empty());
        assert_eq!(eval::NAME, "forecast_eval");
    }
}
