//! Seeded synthetic store data for demos and tests
//!
//! Sales follow a weekly pattern with Gaussian noise and a demand spike on
//! each default exclusion date. The forecast is the noise-free pattern with a
//! 95% interval, so the spikes dominate the full-period MAPE.

use crate::config::ExclusionSet;
use crate::data::{ActualSeries, ForecastPoint, ForecastSeries, SalesPoint};
use crate::error::{ForecastError, Result};
use crate::store::{ActualSalesTable, ForecastTable};
use crate::utils::daily_dates;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Monday-first multipliers applied to a store's base sales
const WEEKLY_PATTERN: [f64; 7] = [0.85, 0.9, 0.95, 1.0, 1.15, 1.3, 1.1];
const NOISE_SD: f64 = 0.08;
const SPIKE_FACTOR: f64 = 2.5;
const FORECAST_DAYS: usize = 90;

/// Shape of the generated data
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub stores: usize,
    /// Days of actual sales history per store
    pub days: usize,
    /// Days of second-horizon forecast after the history ends
    pub outlook_days: usize,
    pub start: NaiveDate,
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            stores: 3,
            days: 180,
            outlook_days: 90,
            start: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap_or_default(),
            seed: 42,
        }
    }
}

/// Generated stores
#[derive(Debug, Clone, PartialEq)]
pub struct DemoData {
    pub actuals: ActualSalesTable,
    pub forecasts: ForecastTable,
    pub outlook: ForecastTable,
}

/// Generate demo stores; the same config always yields the same data
pub fn generate_demo(config: &DemoConfig) -> Result<DemoData> {
    if config.stores == 0 || config.days == 0 {
        return Err(ForecastError::InvalidParameter(
            "Demo data needs at least 1 store and 1 day".to_string(),
        ));
    }

    let noise = Normal::new(0.0, NOISE_SD)
        .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let spikes = ExclusionSet::default();

    let history = daily_dates(config.start, config.days + config.outlook_days)?;
    let (past, future) = history.split_at(config.days);
    let forecast_from = config.days.saturating_sub(FORECAST_DAYS);

    let mut data = DemoData {
        actuals: ActualSalesTable::new(),
        forecasts: ForecastTable::new(),
        outlook: ForecastTable::new(),
    };

    for store in 0..config.stores {
        let key = format!("store_{:02}", store + 1);
        let base = 800.0 + 150.0 * store as f64;

        let actual: Vec<SalesPoint> = past
            .iter()
            .map(|&date| {
                let mut sales = expected(base, date) * (1.0 + noise.sample(&mut rng));
                if spikes.contains(date) {
                    sales *= SPIKE_FACTOR;
                }
                SalesPoint::new(date, sales.max(0.0).round())
            })
            .collect();

        let forecast = past[forecast_from..]
            .iter()
            .map(|&date| interval_point(base, date))
            .collect();
        let outlook = future.iter().map(|&date| interval_point(base, date)).collect();

        data.actuals.insert(key.clone(), ActualSeries::new(actual)?);
        data.forecasts.insert(key.clone(), ForecastSeries::new(forecast)?);
        data.outlook.insert(key, ForecastSeries::new(outlook)?);
    }

    Ok(data)
}

fn expected(base: f64, date: NaiveDate) -> f64 {
    base * WEEKLY_PATTERN[date.weekday().num_days_from_monday() as usize]
}

fn interval_point(base: f64, date: NaiveDate) -> ForecastPoint {
    let mean = expected(base, date);
    let half_width = 1.96 * NOISE_SD * mean;
    ForecastPoint::with_interval(date, mean, mean - half_width, mean + half_width)
}
