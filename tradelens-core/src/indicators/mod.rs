//! Technical indicators over a numeric price series.
//!
//! Every indicator is a pure function: series in, compact series out. Output
//! starts at the first index with a full window, so an `n`-value input yields
//! `n - lookback` values. Any NaN or infinite input, or an input shorter than
//! the window, yields an empty output rather than an error, so one bad series
//! cannot abort a batch of several.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{ema, Ema};
pub use macd::{macd, Macd, MacdOutput};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};

/// Single-series indicator.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading inputs consumed before the first output value.
    fn lookback(&self) -> usize;

    /// Compute the indicator. Output length is `values.len() - lookback()`,
    /// or 0 when the input is too short or not finite.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Default RSI period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Stateless facade over the indicator functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn sma(&self, values: &[f64], period: usize) -> Vec<f64> {
        sma(values, period)
    }

    pub fn ema(&self, values: &[f64], period: usize) -> Vec<f64> {
        ema(values, period)
    }

    pub fn rsi(&self, values: &[f64], period: usize) -> Vec<f64> {
        rsi(values, period)
    }

    pub fn macd(&self, values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
        macd(values, fast, slow, signal)
    }
}

/// True when every value is finite.
pub(crate) fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
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
