//! Price accessors and constants bound to a bar series.

use std::sync::Arc;

use crate::domain::{Bar, BarSeries};
use crate::registry::{Component, Constructor, Param, ParamEnum};

use super::{precomputed_indicator, IndicatorKind};

/// Which bar field a [`PriceIndicator`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceType {
    Open,
    High,
    Low,
    Close,
    Typical,
    Median,
}

impl PriceType {
    pub fn of(&self, bar: &Bar) -> f64 {
        match self {
            Self::Open => bar.open,
            Self::High => bar.high,
            Self::Low => bar.low,
            Self::Close => bar.close,
            Self::Typical => bar.typical_price(),
            Self::Median => bar.median_price(),
        }
    }
}

impl ParamEnum for PriceType {
    const TYPE_NAME: &'static str = "PriceType";

    fn variants() -> &'static [Self] {
        &[
            Self::Open,
            Self::High,
            Self::Low,
            Self::Close,
            Self::Typical,
            Self::Median,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Typical => "Typical",
            Self::Median => "Median",
        }
    }
}

// ─── Price field indicators ──────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PriceIndicator {
    price_type: PriceType,
    values: Vec<f64>,
}

impl PriceIndicator {
    pub fn new(series: &BarSeries, price_type: PriceType) -> Self {
        Self {
            price_type,
            values: series.column(|b| price_type.of(b)),
        }
    }

    pub fn price_type(&self) -> PriceType {
        self.price_type
    }
}

impl Component<IndicatorKind> for PriceIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![
                Param::bar_series("series"),
                Param::enumeration::<PriceType>("price_type"),
            ],
            |args| Ok(Arc::new(Self::new(&*args.bar_series(0)?, args.enumeration(1)?))),
        )]
    }
}

#[derive(Debug, Clone)]
pub struct ClosePriceIndicator {
    values: Vec<f64>,
}

impl ClosePriceIndicator {
    pub fn new(series: &BarSeries) -> Self {
        Self {
            values: series.column(|b| b.close),
        }
    }
}

impl Component<IndicatorKind> for ClosePriceIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(vec![Param::bar_series("series")], |args| {
            Ok(Arc::new(Self::new(&*args.bar_series(0)?)))
        })]
    }
}

#[derive(Debug, Clone)]
pub struct OpenPriceIndicator {
    values: Vec<f64>,
}

impl OpenPriceIndicator {
    pub fn new(series: &BarSeries) -> Self {
        Self {
            values: series.column(|b| b.open),
        }
    }
}

impl Component<IndicatorKind> for OpenPriceIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(vec![Param::bar_series("series")], |args| {
            Ok(Arc::new(Self::new(&*args.bar_series(0)?)))
        })]
    }
}

#[derive(Debug, Clone)]
pub struct HighPriceIndicator {
    values: Vec<f64>,
}

impl HighPriceIndicator {
    pub fn new(series: &BarSeries) -> Self {
        Self {
            values: series.column(|b| b.high),
        }
    }
}

impl Component<IndicatorKind> for HighPriceIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(vec![Param::bar_series("series")], |args| {
            Ok(Arc::new(Self::new(&*args.bar_series(0)?)))
        })]
    }
}

#[derive(Debug, Clone)]
pub struct LowPriceIndicator {
    values: Vec<f64>,
}

impl LowPriceIndicator {
    pub fn new(series: &BarSeries) -> Self {
        Self {
            values: series.column(|b| b.low),
        }
    }
}

impl Component<IndicatorKind> for LowPriceIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(vec![Param::bar_series("series")], |args| {
            Ok(Arc::new(Self::new(&*args.bar_series(0)?)))
        })]
    }
}

#[derive(Debug, Clone)]
pub struct VolumeIndicator {
    values: Vec<f64>,
}

impl VolumeIndicator {
    pub fn new(series: &BarSeries) -> Self {
        Self {
            values: series.column(|b| b.volume),
        }
    }
}

impl Component<IndicatorKind> for VolumeIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(vec![Param::bar_series("series")], |args| {
            Ok(Arc::new(Self::new(&*args.bar_series(0)?)))
        })]
    }
}

/// The same value at every bar of a series.
#[derive(Debug, Clone)]
pub struct ConstantIndicator {
    values: Vec<f64>,
}

impl ConstantIndicator {
    pub fn new(series: &BarSeries, value: f64) -> Self {
        Self {
            values: vec![value; series.len()],
        }
    }
}

impl Component<IndicatorKind> for ConstantIndicator {
    fn constructors() -> Vec<Constructor<IndicatorKind>> {
        vec![Constructor::<IndicatorKind>::new(
            vec![Param::bar_series("series"), Param::num("value")],
            |args| Ok(Arc::new(Self::new(&*args.bar_series(0)?, args.num(1)?))),
        )]
    }
}

precomputed_indicator!(
    PriceIndicator,
    ClosePriceIndicator,
    OpenPriceIndicator,
    HighPriceIndicator,
    LowPriceIndicator,
    VolumeIndicator,
    ConstantIndicator,
);
