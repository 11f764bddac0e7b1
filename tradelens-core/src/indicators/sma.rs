//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window.
//! Lookback: period - 1 (first output corresponds to input index period-1).

use super::{all_finite, Indicator};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        sma(values, self.period)
    }
}

/// SMA of `values` with the given window. Length `max(0, n - period + 1)`.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period || !all_finite(values) {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(n - period + 1);

    // Initial window sum
    let mut sum: f64 = values[..period].iter().sum();
    result.push(sum / period as f64);

    // Roll the window forward
    for i in period..n {
        sum += values[i] - values[i - period];
        result.push(sum / period as f64);
    }

    result
}
