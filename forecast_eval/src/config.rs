//! Dashboard and evaluation configuration
//!
//! Configuration is read from TOML. Every section is optional:
//!
//! ```toml
//! [data]
//! forecasts = "forecasts.json"
//! actuals = "actuals.csv"
//! outlook = "outlook.json"
//!
//! [evaluation]
//! history_window = 90
//! exclude_dates = ["2023-11-23", "2023-12-25"]
//! denominator_policy = "skip"
//!
//! [etl]
//! platforms = ["in-store"]
//! include_promotions = false
//! cutoff = "2023-12-31"
//! ```

use crate::error::{ForecastError, Result};
use crate::etl::EtlConfig;
use chrono::NaiveDate;
use sales_math::DenominatorPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Number of most recent actual observations compared against the forecast
pub const DEFAULT_HISTORY_WINDOW: usize = 90;

/// Demand spikes left out of the excluded-dates MAPE: Thanksgiving and
/// Christmas Day 2023.
pub const DEFAULT_EXCLUDED_DATES: [(i32, u32, u32); 2] = [(2023, 11, 23), (2023, 12, 25)];

/// Calendar dates left out of the excluded-dates MAPE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet {
    dates: BTreeSet<NaiveDate>,
}

impl ExclusionSet {
    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            dates: BTreeSet::new(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::from_dates(
            DEFAULT_EXCLUDED_DATES
                .iter()
                .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        )
    }
}

/// Parameters of a single evaluation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// How many of the most recent actual points to compare
    pub history_window: usize,
    /// Dates left out of the excluded-dates MAPE
    pub exclude_dates: ExclusionSet,
    /// Treatment of zero denominators in percentage metrics
    pub denominator_policy: DenominatorPolicy,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            exclude_dates: ExclusionSet::default(),
            denominator_policy: DenominatorPolicy::default(),
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.history_window == 0 {
            return Err(ForecastError::ConfigError(
                "history_window must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn with_exclusions(mut self, exclude_dates: ExclusionSet) -> Self {
        self.exclude_dates = exclude_dates;
        self
    }

    pub fn with_policy(mut self, policy: DenominatorPolicy) -> Self {
        self.denominator_policy = policy;
        self
    }
}

/// Where store data is read from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Forecast store file (`.csv` or `.json`)
    pub forecasts: Option<PathBuf>,
    /// Actual sales store file (`.csv` or `.json`)
    pub actuals: Option<PathBuf>,
    /// Raw transaction CSV to derive actual sales from
    pub transactions: Option<PathBuf>,
    /// Second-horizon forecast store shown next to the evaluation
    pub outlook: Option<PathBuf>,
}

/// Where actual sales come from once the sources are validated
#[derive(Debug, Clone, PartialEq)]
pub enum ActualsSource {
    Store(PathBuf),
    Transactions(PathBuf),
}

impl SourceConfig {
    /// Forecast path and actual sales source, or a config error naming what
    /// is missing or conflicting.
    pub fn resolve(&self) -> Result<(PathBuf, ActualsSource)> {
        let forecasts = self.forecasts.clone().ok_or_else(|| {
            ForecastError::ConfigError("no forecast store configured".to_string())
        })?;

        let actuals = match (&self.actuals, &self.transactions) {
            (Some(path), None) => ActualsSource::Store(path.clone()),
            (None, Some(path)) => ActualsSource::Transactions(path.clone()),
            (Some(_), Some(_)) => {
                return Err(ForecastError::ConfigError(
                    "configure either actuals or transactions, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(ForecastError::ConfigError(
                    "no actual sales source configured".to_string(),
                ))
            }
        };

        Ok((forecasts, actuals))
    }

    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.forecasts,
            &mut self.actuals,
            &mut self.transactions,
            &mut self.outlook,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data: SourceConfig,
    pub evaluation: EvalConfig,
    pub etl: EtlConfig,
}

impl DashboardConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(s)?;
        config.evaluation.validate()?;
        Ok(config)
    }

    /// Read a TOML file; relative data paths are resolved against the
    /// file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.data.rebase(base);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let set = ExclusionSet::default();
        assert_eq!(set.len(), 2);
        assert!(set.contains(NaiveDate::from_ymd_opt(2023, 11, 23).unwrap()));
        assert!(set.contains(NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config.evaluation, EvalConfig::default());
        assert_eq!(config.evaluation.history_window, 90);
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = DashboardConfig::from_toml_str("[evaluation]\nhistory_window = 0\n").unwrap_err();
        assert!(matches!(err, ForecastError::ConfigError(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = DashboardConfig::from_toml_str("[evaluation]\nwindow = 30\n").unwrap_err();
        assert!(matches!(err, ForecastError::ConfigError(_)));
    }

    #[test]
    fn test_resolve_requires_single_actuals_source() {
        let both = SourceConfig {
            forecasts: Some("f.json".into()),
            actuals: Some("a.json".into()),
            transactions: Some("t.csv".into()),
            outlook: None,
        };
        assert!(both.resolve().is_err());

        let neither = SourceConfig {
            forecasts: Some("f.json".into()),
            ..SourceConfig::default()
        };
        assert!(neither.resolve().is_err());
    }

    #[test]
    fn test_rebase_relative_paths() {
        let mut sources = SourceConfig {
            forecasts: Some("f.json".into()),
            actuals: Some("/abs/a.json".into()),
            ..SourceConfig::default()
        };
        sources.rebase(Path::new("/data"));

        assert_eq!(sources.forecasts, Some(PathBuf::from("/data/f.json")));
        assert_eq!(sources.actuals, Some(PathBuf::from("/abs/a.json")));
    }
}
