//! Bar series: an ordered, named sequence of bars for one instrument/interval.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Bar;

/// Bar interval of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "15m")]
    FifteenMinute,
    #[serde(rename = "30m")]
    ThirtyMinute,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1w")]
    Week,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinute => "5m",
            Self::FifteenMinute => "15m",
            Self::ThirtyMinute => "30m",
            Self::OneHour => "1h",
            Self::Day => "1d",
            Self::Week => "1w",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named bar series. Bars are ordered by timestamp, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    name: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(name: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            name: name.into(),
            bars,
        }
    }

    /// Synthetic daily series from close prices.
    ///
    /// open = previous close (or close for the first bar),
    /// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
    pub fn from_closes(name: impl Into<String>, closes: &[f64]) -> Self {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    timestamp: base + Duration::days(i as i64),
                    open,
                    high: open.max(close) + 1.0,
                    low: open.min(close) - 1.0,
                    close,
                    volume: 1000.0,
                }
            })
            .collect();
        Self::new(name, bars)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Extract one column as a numeric series.
    pub fn column(&self, field: impl Fn(&Bar) -> f64) -> Vec<f64> {
        self.bars.iter().map(field).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.column(|b| b.close)
    }
}
