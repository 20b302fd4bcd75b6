//! Indicator capability and the built-in indicator kinds.
//!
//! Indicators are precomputed once at construction: the whole output series
//! is materialized from the input (a bar series or another indicator) and
//! then queried by bar index. No recomputation on each bar.

pub mod helpers;
pub mod momentum;
pub mod price;
pub mod trend;
pub mod volatility;

pub use helpers::{DifferenceIndicator, HighestValueIndicator, LowestValueIndicator};
pub use momentum::{RocIndicator, RsiIndicator};
pub use price::{
    ClosePriceIndicator, ConstantIndicator, HighPriceIndicator, LowPriceIndicator,
    OpenPriceIndicator, PriceIndicator, PriceType, VolumeIndicator,
};
pub use trend::{EmaIndicator, SmaIndicator};
pub use volatility::AtrIndicator;

use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::registry::{ComponentKind, ComponentRegistry};

/// A numeric series indexed by bar.
///
/// Values before the indicator has enough history are `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on data from bar t+1 or later.
pub trait Indicator: Send + Sync + fmt::Debug {
    /// The full precomputed series.
    fn series(&self) -> &[f64];

    /// Number of leading warmup bars (NaN values).
    fn unstable_bars(&self) -> usize {
        self.series()
            .iter()
            .position(|v| !v.is_nan())
            .unwrap_or(self.series().len())
    }

    /// Value at `index`, or NaN when undefined or out of range.
    fn value(&self, index: usize) -> f64 {
        self.series().get(index).copied().unwrap_or(f64::NAN)
    }

    fn len(&self) -> usize {
        self.series().len()
    }

    fn is_empty(&self) -> bool {
        self.series().is_empty()
    }
}

/// The indicator component kind.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorKind;

impl ComponentKind for IndicatorKind {
    const NAME: &'static str = "indicator";
    type Output = Arc<dyn Indicator>;
}

pub type IndicatorRegistry = ComponentRegistry<IndicatorKind>;

/// Registry of every built-in indicator.
pub fn default_registry() -> Result<IndicatorRegistry, RegistryError> {
    IndicatorRegistry::builder()
        .register::<ClosePriceIndicator>()
        .register::<OpenPriceIndicator>()
        .register::<HighPriceIndicator>()
        .register::<LowPriceIndicator>()
        .register::<VolumeIndicator>()
        .register::<PriceIndicator>()
        .register::<ConstantIndicator>()
        .register::<SmaIndicator>()
        .register::<EmaIndicator>()
        .register::<RsiIndicator>()
        .register::<RocIndicator>()
        .register::<AtrIndicator>()
        .register::<HighestValueIndicator>()
        .register::<LowestValueIndicator>()
        .register::<DifferenceIndicator>()
        .build()
}

/// Implements [`Indicator`] for a type holding its series in `values`.
macro_rules! precomputed_indicator {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::components::indicator::Indicator for $ty {
                fn series(&self) -> &[f64] {
                    &self.values
                }
            }
        )+
    };
}
pub(crate) use precomputed_indicator;
