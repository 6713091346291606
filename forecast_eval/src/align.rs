//! Date-wise alignment of actual and forecast series

use crate::config::ExclusionSet;
use crate::data::{ActualSeries, ForecastSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::io::Write;
use tracing::debug;

/// One date present in both series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub actual: f64,
    pub forecast: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Inner join of an actual and a forecast series, ordered by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedTable {
    rows: Vec<AlignedRow>,
}

/// Join `actual` and `forecast` on exact date equality.
///
/// Dates present in only one series are dropped. Fails with
/// [`ForecastError::AlignmentEmpty`] when no date is shared.
pub fn align(actual: &ActualSeries, forecast: &ForecastSeries) -> Result<AlignedTable> {
    let actual_points = actual.points();
    let forecast_points = forecast.points();
    let mut rows = Vec::with_capacity(actual_points.len().min(forecast_points.len()));

    // both sides are sorted with unique dates
    let (mut i, mut j) = (0, 0);
    while i < actual_points.len() && j < forecast_points.len() {
        let a = &actual_points[i];
        let f = &forecast_points[j];
        match a.date.cmp(&f.date) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                rows.push(AlignedRow {
                    date: a.date,
                    actual: a.sales,
                    forecast: f.forecast,
                    lower: f.lower,
                    upper: f.upper,
                });
                i += 1;
                j += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(ForecastError::AlignmentEmpty {
            actual_points: actual_points.len(),
            forecast_points: forecast_points.len(),
        });
    }

    debug!(
        actual = actual_points.len(),
        forecast = forecast_points.len(),
        aligned = rows.len(),
        "aligned series"
    );

    Ok(AlignedTable { rows })
}

impl AlignedTable {
    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn actuals(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.actual).collect()
    }

    pub fn forecasts(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.forecast).collect()
    }

    /// `true` for every row whose date is not excluded
    pub fn keep_mask(&self, exclusions: &ExclusionSet) -> Vec<bool> {
        self.rows
            .iter()
            .map(|r| !exclusions.contains(r.date))
            .collect()
    }

    /// Number of rows whose date is in `exclusions`
    pub fn excluded_count(&self, exclusions: &ExclusionSet) -> usize {
        self.rows
            .iter()
            .filter(|r| exclusions.contains(r.date))
            .count()
    }

    /// Build a DataFrame with columns `date, actual, forecast, lower, upper`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let dates: Vec<String> = self.rows.iter().map(|r| r.date.to_string()).collect();
        let lower: Vec<Option<f64>> = self.rows.iter().map(|r| r.lower).collect();
        let upper: Vec<Option<f64>> = self.rows.iter().map(|r| r.upper).collect();

        let df = DataFrame::new(vec![
            Series::new("date", dates),
            Series::new("actual", self.actuals()),
            Series::new("forecast", self.forecasts()),
            Series::new("lower", lower),
            Series::new("upper", upper),
        ])?;

        Ok(df)
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut df = self.to_dataframe()?;
        CsvWriter::new(writer).has_header(true).finish(&mut df)?;
        Ok(())
    }
}
