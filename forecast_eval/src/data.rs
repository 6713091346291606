//! Sales series handling and loading
//!
//! Actual and forecast series are kept sorted by date with unique dates, so
//! alignment can walk both in a single merge pass.

use crate::error::{ForecastError, Result};
use crate::store::{ActualSalesTable, ForecastTable};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tracing::debug;

/// One observed day of sales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub sales: f64,
}

impl SalesPoint {
    pub fn new(date: NaiveDate, sales: f64) -> Self {
        Self { date, sales }
    }
}

/// One forecasted day, optionally with a prediction interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl ForecastPoint {
    /// Create a point forecast without interval bounds
    pub fn new(date: NaiveDate, forecast: f64) -> Self {
        Self {
            date,
            forecast,
            lower: None,
            upper: None,
        }
    }

    /// Create a point forecast with interval bounds
    pub fn with_interval(date: NaiveDate, forecast: f64, lower: f64, upper: f64) -> Self {
        Self {
            date,
            forecast,
            lower: Some(lower),
            upper: Some(upper),
        }
    }
}

/// Observed daily sales for one store, ordered by date
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActualSeries {
    points: Vec<SalesPoint>,
}

impl ActualSeries {
    /// Build a series, sorting by date and rejecting duplicate dates and
    /// negative or non-finite sales.
    pub fn new(mut points: Vec<SalesPoint>) -> Result<Self> {
        if let Some(bad) = points
            .iter()
            .find(|p| !p.sales.is_finite() || p.sales < 0.0)
        {
            return Err(ForecastError::DataError(format!(
                "Sales on {} must be finite and non-negative, got {}",
                bad.date, bad.sales
            )));
        }

        points.sort_by_key(|p| p.date);
        check_unique_dates(points.iter().map(|p| p.date))?;

        Ok(Self { points })
    }

    /// Build a series from parallel date and value vectors
    pub fn from_parts(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        Self::new(
            dates
                .into_iter()
                .zip(values)
                .map(|(date, sales)| SalesPoint::new(date, sales))
                .collect(),
        )
    }

    pub fn points(&self) -> &[SalesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.sales).collect()
    }

    /// Sales observed on `date`, if any
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].sales)
    }

    /// The most recent `n` observations (the whole series if shorter)
    pub fn tail(&self, n: usize) -> Self {
        let start = self.points.len().saturating_sub(n);
        Self {
            points: self.points[start..].to_vec(),
        }
    }
}

impl Serialize for ActualSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ActualSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let points = Vec::<SalesPoint>::deserialize(deserializer)?;
        ActualSeries::new(points).map_err(serde::de::Error::custom)
    }
}

/// Forecasted daily sales for one store, ordered by date
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Build a series, sorting by date. Duplicate dates, non-finite values,
    /// negative forecasts and inverted intervals are rejected. A lower bound
    /// may be negative.
    pub fn new(mut points: Vec<ForecastPoint>) -> Result<Self> {
        for p in &points {
            let bounds_finite = p.lower.map_or(true, f64::is_finite)
                && p.upper.map_or(true, f64::is_finite);
            if !p.forecast.is_finite() || !bounds_finite {
                return Err(ForecastError::DataError(format!(
                    "Forecast on {} has a non-finite value",
                    p.date
                )));
            }
            if p.forecast < 0.0 {
                return Err(ForecastError::DataError(format!(
                    "Forecast on {} must be non-negative, got {}",
                    p.date, p.forecast
                )));
            }
            if let (Some(lower), Some(upper)) = (p.lower, p.upper) {
                if lower > upper {
                    return Err(ForecastError::DataError(format!(
                        "Forecast interval on {} is inverted ({} > {})",
                        p.date, lower, upper
                    )));
                }
            }
        }

        points.sort_by_key(|p| p.date);
        check_unique_dates(points.iter().map(|p| p.date))?;

        Ok(Self { points })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.forecast).collect()
    }

    /// Whether every point carries both interval bounds
    pub fn has_intervals(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.lower.is_some() && p.upper.is_some())
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ForecastPoint> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| &self.points[i])
    }
}

impl Serialize for ForecastSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ForecastSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let points = Vec::<ForecastPoint>::deserialize(deserializer)?;
        ForecastSeries::new(points).map_err(serde::de::Error::custom)
    }
}

fn check_unique_dates(sorted: impl Iterator<Item = NaiveDate>) -> Result<()> {
    let mut previous: Option<NaiveDate> = None;
    for date in sorted {
        if previous == Some(date) {
            return Err(ForecastError::DataError(format!(
                "Duplicate date {} in series",
                date
            )));
        }
        previous = Some(date);
    }
    Ok(())
}

/// Supported store file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Long format, one row per store and day
    Csv,
    /// Object mapping store key to an array of points
    Json,
}

impl FileFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(ForecastError::InvalidParameter(format!(
                "Unsupported store file '{}': expected .csv or .json",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActualRecord {
    store_key: String,
    date: NaiveDate,
    sales: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastRecord {
    store_key: String,
    date: NaiveDate,
    forecast: f64,
    #[serde(default)]
    lower: Option<f64>,
    #[serde(default)]
    upper: Option<f64>,
}

/// Data loader for store sales files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load actual sales from a `.csv` or `.json` file
    pub fn actuals_from_path<P: AsRef<Path>>(path: P) -> Result<ActualSalesTable> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let file = File::open(path)?;

        let table = match format {
            FileFormat::Csv => Self::actuals_from_csv(file)?,
            FileFormat::Json => Self::actuals_from_json(file)?,
        };
        debug!(path = %path.display(), stores = table.len(), "loaded actual sales");
        Ok(table)
    }

    /// Load forecasts from a `.csv` or `.json` file
    pub fn forecasts_from_path<P: AsRef<Path>>(path: P) -> Result<ForecastTable> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let file = File::open(path)?;

        let table = match format {
            FileFormat::Csv => Self::forecasts_from_csv(file)?,
            FileFormat::Json => Self::forecasts_from_json(file)?,
        };
        debug!(path = %path.display(), stores = table.len(), "loaded forecasts");
        Ok(table)
    }

    /// Read `store_key,date,sales` rows
    pub fn actuals_from_csv<R: Read>(reader: R) -> Result<ActualSalesTable> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut grouped: BTreeMap<String, Vec<SalesPoint>> = BTreeMap::new();

        for record in rdr.deserialize::<ActualRecord>() {
            let record = record?;
            grouped
                .entry(record.store_key)
                .or_default()
                .push(SalesPoint::new(record.date, record.sales));
        }

        grouped
            .into_iter()
            .map(|(key, points)| {
                let series = ActualSeries::new(points).map_err(|e| with_store(&key, e))?;
                Ok((key, series))
            })
            .collect()
    }

    /// Read `store_key,date,forecast,lower,upper` rows; bounds may be empty
    pub fn forecasts_from_csv<R: Read>(reader: R) -> Result<ForecastTable> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut grouped: BTreeMap<String, Vec<ForecastPoint>> = BTreeMap::new();

        for record in rdr.deserialize::<ForecastRecord>() {
            let record = record?;
            grouped.entry(record.store_key).or_default().push(ForecastPoint {
                date: record.date,
                forecast: record.forecast,
                lower: record.lower,
                upper: record.upper,
            });
        }

        grouped
            .into_iter()
            .map(|(key, points)| {
                let series = ForecastSeries::new(points).map_err(|e| with_store(&key, e))?;
                Ok((key, series))
            })
            .collect()
    }

    /// Read a JSON bundle mapping store key to sales points
    pub fn actuals_from_json<R: Read>(reader: R) -> Result<ActualSalesTable> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    /// Read a JSON bundle mapping store key to forecast points
    pub fn forecasts_from_json<R: Read>(reader: R) -> Result<ForecastTable> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    /// Write actual sales as a JSON bundle
    pub fn write_actuals_json<W: Write>(table: &ActualSalesTable, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, table)?;
        Ok(())
    }

    /// Write forecasts as a JSON bundle
    pub fn write_forecasts_json<W: Write>(table: &ForecastTable, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, table)?;
        Ok(())
    }
}

pub(crate) fn with_store(key: &str, err: ForecastError) -> ForecastError {
    match err {
        ForecastError::DataError(msg) => {
            ForecastError::DataError(format!("Store '{}': {}", key, msg))
        }
        other => other,
    }
}
