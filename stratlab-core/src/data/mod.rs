//! Bar-series loading.
//!
//! The assembler calls a caller-supplied [`BarSeriesLoader`] for every bar
//! series a strategy declares. Two loaders ship with the crate: CSV files
//! on disk and an in-memory map for tests and embedding.

pub mod csv_loader;
pub mod memory;

pub use csv_loader::CsvBarSeriesLoader;
pub use memory::InMemoryBarSeriesLoader;

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::BarSeriesConfig;
use crate::domain::{Bar, BarSeries};

/// Structured error types for bar-series loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data file for '{instrument}' at {}", path.display())]
    NotFound { instrument: String, path: PathBuf },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid date '{value}' in {}", path.display())]
    InvalidDate { path: PathBuf, value: String },

    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("no bars for '{name}' in the requested date range")]
    Empty { name: String },
}

/// Supplies bar data for a declared series.
pub trait BarSeriesLoader: Send + Sync {
    fn load(&self, config: &BarSeriesConfig) -> Result<BarSeries, LoadError>;
}

/// Keep bars within the inclusive date range, sorted by timestamp.
pub(crate) fn select_range(
    mut bars: Vec<Bar>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Bar> {
    bars.retain(|b| {
        let date = b.timestamp.date();
        start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
    });
    bars.sort_by_key(|b| b.timestamp);
    bars
}

/// Wrap selected bars into a series named after the config, rejecting empty results.
pub(crate) fn finish(config: &BarSeriesConfig, bars: Vec<Bar>) -> Result<BarSeries, LoadError> {
    let bars = select_range(bars, config.start_date, config.end_date);
    if bars.is_empty() {
        return Err(LoadError::Empty {
            name: config.name.clone(),
        });
    }
    Ok(BarSeries::new(config.name.clone(), bars))
}
