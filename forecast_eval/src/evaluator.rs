//! Forecast accuracy evaluator
//!
//! One evaluator serves every data source: it only needs a [`ForecastStore`]
//! and an [`ActualSalesStore`]. Each call to [`Evaluator::evaluate`] is an
//! independent pass over immutable stores.

use crate::align::{align, AlignedTable};
use crate::config::EvalConfig;
use crate::data::ForecastSeries;
use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate_table, AccuracyReport};
use crate::store::{ActualSalesStore, ForecastStore};
use serde::Serialize;
use tracing::{info, warn};

/// Result of evaluating one store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub store_key: String,
    /// Actual vs forecast rows for charting
    pub table: AlignedTable,
    pub accuracy: AccuracyReport,
    /// Second-horizon forecast for the same store, when an outlook store is set
    pub outlook: Option<ForecastSeries>,
}

/// Evaluates stored forecasts against recent actual sales
#[derive(Debug, Clone)]
pub struct Evaluator<F, A> {
    forecasts: F,
    actuals: A,
    outlook: Option<F>,
    config: EvalConfig,
}

impl<F: ForecastStore, A: ActualSalesStore> Evaluator<F, A> {
    pub fn new(forecasts: F, actuals: A, config: EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            forecasts,
            actuals,
            outlook: None,
            config,
        })
    }

    /// Attach a second-horizon forecast store
    pub fn with_outlook(mut self, outlook: F) -> Self {
        self.outlook = Some(outlook);
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Store keys that can be selected, i.e. those with a forecast
    pub fn store_keys(&self) -> Vec<&str> {
        self.forecasts.keys()
    }

    /// Evaluate one store.
    ///
    /// The most recent `history_window` actual points are aligned with the
    /// forecast and scored. A key missing from either store is a
    /// [`ForecastError::NotFound`].
    pub fn evaluate(&self, key: &str) -> Result<Evaluation> {
        let forecast = self.forecasts.get(key).ok_or_else(|| ForecastError::NotFound {
            store: "forecast",
            key: key.to_string(),
        })?;
        let history = self.actuals.get(key).ok_or_else(|| ForecastError::NotFound {
            store: "actual sales",
            key: key.to_string(),
        })?;

        let recent = history.tail(self.config.history_window);
        let table = align(&recent, forecast)?;
        let accuracy = evaluate_table(
            &table,
            &self.config.exclude_dates,
            self.config.denominator_policy,
        )?;

        let outlook = match &self.outlook {
            Some(store) => {
                let series = store.get(key).cloned();
                if series.is_none() {
                    warn!(store_key = key, "no outlook forecast for store");
                }
                series
            }
            None => None,
        };

        info!(
            store_key = key,
            days = table.len(),
            mape = accuracy.mape.value,
            smape = accuracy.smape.value,
            mape_excluding = accuracy.mape_excluding.value,
            "evaluated store"
        );

        Ok(Evaluation {
            store_key: key.to_string(),
            table,
            accuracy,
            outlook,
        })
    }

    /// Evaluate every selectable store in key order; failures are kept per key
    pub fn evaluate_all(&self) -> Vec<(String, Result<Evaluation>)> {
        self.store_keys()
            .into_iter()
            .map(|key| (key.to_string(), self.evaluate(key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusionSet;
    use crate::data::{ActualSeries, ForecastPoint, SalesPoint};
    use crate::store::{ActualSalesTable, ForecastTable};
    use sales_math::DenominatorPolicy;
    use chrono::{Days, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 9, 1).unwrap()
    }

    fn stores() -> (ForecastTable, ActualSalesTable) {
        let mut forecasts = ForecastTable::new();
        let mut actuals = ActualSalesTable::new();

        let history: Vec<SalesPoint> = (0..120)
            .map(|i| SalesPoint::new(start() + Days::new(i), 100.0))
            .collect();
        actuals.insert("s1", ActualSeries::new(history).unwrap());

        // covers the whole history, but only the last 90 days should count
        let forecast: Vec<ForecastPoint> = (0..120)
            .map(|i| {
                let value = if i < 30 { 1000.0 } else { 110.0 };
                ForecastPoint::new(start() + Days::new(i), value)
            })
            .collect();
        forecasts.insert("s1", ForecastSeries::new(forecast).unwrap());

        (forecasts, actuals)
    }

    #[test]
    fn test_uses_most_recent_window() {
        let (forecasts, actuals) = stores();
        let evaluator = Evaluator::new(&forecasts, &actuals, EvalConfig::default()).unwrap();

        let evaluation = evaluator.evaluate("s1").unwrap();
        assert_eq!(evaluation.table.len(), 90);
        assert!((evaluation.accuracy.mape.value - 10.0).abs() < 1e-9);
        assert!(evaluation.outlook.is_none());
    }

    #[test]
    fn test_missing_forecast_key() {
        let (forecasts, actuals) = stores();
        let evaluator = Evaluator::new(&forecasts, &actuals, EvalConfig::default()).unwrap();

        match evaluator.evaluate("nope") {
            Err(ForecastError::NotFound { store, key }) => {
                assert_eq!(store, "forecast");
                assert_eq!(key, "nope");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_actuals_key() {
        let (mut forecasts, actuals) = stores();
        forecasts.insert(
            "s2",
            ForecastSeries::new(vec![ForecastPoint::new(start(), 1.0)]).unwrap(),
        );
        let evaluator = Evaluator::new(&forecasts, &actuals, EvalConfig::default()).unwrap();

        assert!(matches!(
            evaluator.evaluate("s2"),
            Err(ForecastError::NotFound {
                store: "actual sales",
                ..
            })
        ));
    }

    #[test]
    fn test_custom_exclusions_and_policy() {
        let (forecasts, actuals) = stores();
        let config = EvalConfig::default()
            .with_exclusions(ExclusionSet::from_dates(NaiveDate::from_ymd_opt(2023, 10, 1)))
            .with_policy(DenominatorPolicy::Propagate);
        let evaluator = Evaluator::new(&forecasts, &actuals, config).unwrap();

        let evaluation = evaluator.evaluate("s1").unwrap();
        assert_eq!(evaluation.accuracy.excluded_points, 1);
        assert_eq!(evaluation.accuracy.mape_excluding.points, 89);
        assert_eq!(evaluation.accuracy.policy, DenominatorPolicy::Propagate);
    }

    #[test]
    fn test_zero_window_rejected() {
        let (forecasts, actuals) = stores();
        let config = EvalConfig::default().with_history_window(0);
        assert!(Evaluator::new(&forecasts, &actuals, config).is_err());
    }
}
