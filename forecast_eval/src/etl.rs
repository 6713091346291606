//! Derive daily actual sales from raw transaction rows
//!
//! Input is CSV with columns `store_key,date,sales,platform,promotion`.
//! Rows are filtered by platform, promotion flag and cutoff date, then summed
//! per store and calendar day.

use crate::data::{with_store, ActualSeries, SalesPoint};
use crate::error::{ForecastError, Result};
use crate::store::ActualSalesTable;
use crate::utils::{date_parser, parse_flag};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Filters applied to transaction rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    /// Platforms to keep, compared case-insensitively; empty keeps all
    pub platforms: Vec<String>,
    /// Keep rows flagged as promotional
    pub include_promotions: bool,
    /// Drop rows dated after this day
    pub cutoff: Option<NaiveDate>,
}

/// Row counts from one ETL run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EtlSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_platform: usize,
    pub dropped_promotion: usize,
    pub dropped_cutoff: usize,
}

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    store_key: String,
    date: String,
    sales: f64,
    #[serde(default)]
    platform: String,
    #[serde(default)]
    promotion: String,
}

impl EtlConfig {
    fn keeps_platform(&self, platform: &str) -> bool {
        self.platforms.is_empty()
            || self
                .platforms
                .iter()
                .any(|p| p.trim().eq_ignore_ascii_case(platform.trim()))
    }
}

/// Build actual sales from a transaction CSV file
pub fn build_actuals_from_path<P: AsRef<Path>>(
    path: P,
    config: &EtlConfig,
) -> Result<ActualSalesTable> {
    let path = path.as_ref();
    let (table, summary) = build_actuals_with_summary(File::open(path)?, config)?;
    info!(
        path = %path.display(),
        stores = table.len(),
        rows_read = summary.rows_read,
        rows_kept = summary.rows_kept,
        "derived actual sales from transactions"
    );
    Ok(table)
}

/// Build actual sales from transaction rows
pub fn build_actuals<R: Read>(reader: R, config: &EtlConfig) -> Result<ActualSalesTable> {
    build_actuals_with_summary(reader, config).map(|(table, _)| table)
}

/// Build actual sales and report how many rows each filter dropped
pub fn build_actuals_with_summary<R: Read>(
    reader: R,
    config: &EtlConfig,
) -> Result<(ActualSalesTable, EtlSummary)> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut daily: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    let mut summary = EtlSummary::default();

    for (line, record) in rdr.deserialize::<TransactionRecord>().enumerate() {
        let record = record?;
        summary.rows_read += 1;

        if !config.keeps_platform(&record.platform) {
            summary.dropped_platform += 1;
            continue;
        }

        let promotional = parse_flag(&record.promotion).map_err(|e| at_row(line, e))?;
        if promotional && !config.include_promotions {
            summary.dropped_promotion += 1;
            continue;
        }

        let date = date_parser(&record.date).map_err(|e| at_row(line, e))?;
        if config.cutoff.map_or(false, |cutoff| date > cutoff) {
            summary.dropped_cutoff += 1;
            continue;
        }

        summary.rows_kept += 1;
        *daily
            .entry(record.store_key)
            .or_default()
            .entry(date)
            .or_insert(0.0) += record.sales;
    }

    debug!(?summary, "transaction filters applied");

    let table = daily
        .into_iter()
        .map(|(key, days)| {
            let points = days
                .into_iter()
                .map(|(date, sales)| SalesPoint::new(date, sales))
                .collect();
            let series = ActualSeries::new(points).map_err(|e| with_store(&key, e))?;
            Ok((key, series))
        })
        .collect::<Result<ActualSalesTable>>()?;

    Ok((table, summary))
}

fn at_row(index: usize, err: ForecastError) -> ForecastError {
    match err {
        // +2: header line and 1-based numbering
        ForecastError::DataError(msg) => {
            ForecastError::DataError(format!("Line {}: {}", index + 2, msg))
        }
        other => other,
    }
}
