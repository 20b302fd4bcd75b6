//! CSV bar-series loader: `<dir>/<instrument>_<interval>.csv`.
//!
//! Expected header: `date,open,high,low,close,volume`. Dates are
//! `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` (a `T` separator is accepted too).

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{finish, BarSeriesLoader, LoadError};
use crate::config::BarSeriesConfig;
use crate::domain::{Bar, BarSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Clone)]
pub struct CsvBarSeriesLoader {
    data_dir: PathBuf,
}

impl CsvBarSeriesLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn file_path(&self, config: &BarSeriesConfig) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}.csv", config.instrument, config.interval))
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Read every bar from a CSV file, in file order.
pub fn read_csv_bars(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut bars = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let timestamp = parse_timestamp(&row.date).ok_or_else(|| LoadError::InvalidDate {
            path: path.to_path_buf(),
            value: row.date.clone(),
        })?;
        bars.push(Bar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}

impl BarSeriesLoader for CsvBarSeriesLoader {
    fn load(&self, config: &BarSeriesConfig) -> Result<BarSeries, LoadError> {
        let path = self.file_path(config);
        if !path.is_file() {
            return Err(LoadError::NotFound {
                instrument: config.instrument.clone(),
                path,
            });
        }
        let bars = read_csv_bars(&path)?;
        debug!(series = %config.name, path = %path.display(), bars = bars.len(), "read CSV bars");
        finish(config, bars)
    }
}
