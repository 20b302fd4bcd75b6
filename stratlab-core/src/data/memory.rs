//! In-memory bar-series loader, keyed by instrument.

use std::collections::HashMap;

use super::{finish, BarSeriesLoader, LoadError};
use crate::config::BarSeriesConfig;
use crate::domain::BarSeries;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBarSeriesLoader {
    series: HashMap<String, BarSeries>,
}

impl InMemoryBarSeriesLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, instrument: impl Into<String>, series: BarSeries) -> Self {
        self.insert(instrument, series);
        self
    }

    pub fn insert(&mut self, instrument: impl Into<String>, series: BarSeries) {
        self.series.insert(instrument.into(), series);
    }
}

impl BarSeriesLoader for InMemoryBarSeriesLoader {
    fn load(&self, config: &BarSeriesConfig) -> Result<BarSeries, LoadError> {
        let series = self
            .series
            .get(&config.instrument)
            .ok_or_else(|| LoadError::UnknownInstrument(config.instrument.clone()))?;
        finish(config, series.bars().to_vec())
    }
}
