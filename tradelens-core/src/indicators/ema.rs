//! Exponential Moving Average (EMA).
//!
//! Seed: mean of the first `period` values.
//! Then: EMA[t] = (v[t] - EMA[t-1]) * multiplier + EMA[t-1], multiplier = 2/(period+1).
//! Lookback: period - 1.

use super::{all_finite, Indicator};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        ema(values, self.period)
    }
}

/// EMA of `values`. Length `max(0, n - period + 1)`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period || !all_finite(values) {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    let seed = values[..period].iter().sum::<f64>() / period as f64;
    let mut result = Vec::with_capacity(n - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &v in &values[period..] {
        let next = (v - prev) * multiplier + prev;
        result.push(next);
        prev = next;
    }

    result
}
