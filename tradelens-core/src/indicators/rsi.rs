//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses:
//! avg = (avg * (period - 1) + x) / period.
//! RS = avg_gain / avg_loss, with RS pinned to 100 when avg_loss == 0.
//! RSI = 100 - 100 / (1 + RS).
//! Lookback: period (first output uses the first `period` price changes).

use super::{all_finite, Indicator, DEFAULT_RSI_PERIOD};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        rsi(values, self.period)
    }
}

/// RSI of `values`. Length `max(0, n - period)`; every value lies in [0, 100].
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if period == 0 || n < period + 1 || !all_finite(values) {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip();

    let p = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / p;

    let mut result = Vec::with_capacity(n - period);
    let Some(seed) = compute_rsi(avg_gain, avg_loss) else {
        return Vec::new();
    };
    result.push(seed);

    for i in period..gains.len() {
        avg_gain = (avg_gain * (p - 1.0) + gains[i]) / p;
        avg_loss = (avg_loss * (p - 1.0) + losses[i]) / p;
        match compute_rsi(avg_gain, avg_loss) {
            Some(value) => result.push(value),
            None => return Vec::new(),
        }
    }

    result
}

/// `None` once the averages have overflowed.
fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return None;
    }
    let rs = if avg_loss == 0.0 {
        100.0
    } else {
        avg_gain / avg_loss
    };
    Some((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
}
