//! Lookup stores for per-store series
//!
//! The evaluator only sees the [`ForecastStore`] and [`ActualSalesStore`]
//! traits, so any backing (in-memory tables, ETL output, test fixtures) can
//! feed it. Tables are built once and read-only afterwards.

use crate::data::{ActualSeries, ForecastSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source of forecast series keyed by store
pub trait ForecastStore {
    /// Forecast for `key`, or `None` when the store has no entry
    fn get(&self, key: &str) -> Option<&ForecastSeries>;

    /// All store keys with a forecast, in a stable order
    fn keys(&self) -> Vec<&str>;
}

/// Source of actual sales history keyed by store
pub trait ActualSalesStore {
    /// Full sales history for `key`, or `None` when the store has no entry
    fn get(&self, key: &str) -> Option<&ActualSeries>;

    /// All store keys with sales history, in a stable order
    fn keys(&self) -> Vec<&str>;
}

impl<T: ForecastStore + ?Sized> ForecastStore for &T {
    fn get(&self, key: &str) -> Option<&ForecastSeries> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<&str> {
        (**self).keys()
    }
}

impl<T: ActualSalesStore + ?Sized> ActualSalesStore for &T {
    fn get(&self, key: &str) -> Option<&ActualSeries> {
        (**self).get(key)
    }

    fn keys(&self) -> Vec<&str> {
        (**self).keys()
    }
}

/// In-memory forecast store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastTable {
    series: BTreeMap<String, ForecastSeries>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the forecast for `key`
    pub fn insert(&mut self, key: impl Into<String>, series: ForecastSeries) {
        self.series.insert(key.into(), series);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl ForecastStore for ForecastTable {
    fn get(&self, key: &str) -> Option<&ForecastSeries> {
        self.series.get(key)
    }

    fn keys(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }
}

impl FromIterator<(String, ForecastSeries)> for ForecastTable {
    fn from_iter<I: IntoIterator<Item = (String, ForecastSeries)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

/// In-memory actual sales store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActualSalesTable {
    series: BTreeMap<String, ActualSeries>,
}

impl ActualSalesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the sales history for `key`
    pub fn insert(&mut self, key: impl Into<String>, series: ActualSeries) {
        self.series.insert(key.into(), series);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl ActualSalesStore for ActualSalesTable {
    fn get(&self, key: &str) -> Option<&ActualSeries> {
        self.series.get(key)
    }

    fn keys(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }
}

impl FromIterator<(String, ActualSeries)> for ActualSalesTable {
    fn from_iter<I: IntoIterator<Item = (String, ActualSeries)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}
