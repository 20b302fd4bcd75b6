//! Indicator math over numeric series.
//!
//! Every function takes a slice of `f64` (or bars, for ATR) and returns a
//! `Vec<f64>` of the same length. Warmup positions are `f64::NAN`. Leading
//! NaNs in the input (an upstream indicator's warmup) shift the warmup
//! forward instead of poisoning the whole output, so indicators chain.
//!
//! These functions know nothing about registries or scopes; the component
//! wrappers in `components::indicator` call them once at construction.

pub mod atr;
pub mod ema;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod window;

pub use atr::{atr_of_bars, true_range, wilder_smooth};
pub use ema::ema_of_series;
pub use roc::roc_of_series;
pub use rsi::rsi_of_series;
pub use sma::sma_of_series;
pub use window::{rolling_max, rolling_min};

/// Index of the first non-NaN value, if any.
pub(crate) fn first_valid(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !v.is_nan())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
