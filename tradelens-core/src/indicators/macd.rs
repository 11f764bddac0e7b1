//! Moving Average Convergence/Divergence (MACD).
//!
//! macd_line = EMA(fast) - EMA(slow), aligned on the trailing range both cover.
//! signal_line = EMA(macd_line, signal).
//! histogram = macd_line - signal_line over the range the signal covers.
//!
//! Multi-series, so it does not implement the single-series `Indicator` trait.

use serde::{Deserialize, Serialize};

use super::ema::ema;

/// The three MACD series. `signal_line` and `histogram` have equal length;
/// `macd_line` is longer by `signal - 1`. All empty when the input is invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdOutput {
    pub fn is_empty(&self) -> bool {
        self.macd_line.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inputs consumed before the first histogram value.
    pub fn lookback(&self) -> usize {
        self.fast.max(self.slow).saturating_sub(1) + self.signal.saturating_sub(1)
    }

    pub fn compute(&self, values: &[f64]) -> MacdOutput {
        macd(values, self.fast, self.slow, self.signal)
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

/// MACD of `values`. Returns an empty output if any stage lacks data.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    if fast_ema.is_empty() || slow_ema.is_empty() {
        return MacdOutput::default();
    }

    // Both series end at the last input; keep the overlapping tail.
    let len = fast_ema.len().min(slow_ema.len());
    let fast_tail = &fast_ema[fast_ema.len() - len..];
    let slow_tail = &slow_ema[slow_ema.len() - len..];
    let macd_line: Vec<f64> = fast_tail
        .iter()
        .zip(slow_tail)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema(&macd_line, signal);
    if signal_line.is_empty() {
        return MacdOutput::default();
    }

    let offset = macd_line.len() - signal_line.len();
    let histogram = macd_line[offset..]
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdOutput {
        macd_line,
        signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn macd_lengths() {
        let values = ramp(40);
        let out = macd(&values, 12, 26, 9);
        // slow EMA: 40 - 26 + 1 = 15 values; signal: 15 - 9 + 1 = 7
        assert_eq!(out.macd_line.len(), 15);
        assert_eq!(out.signal_line.len(), 7);
        assert_eq!(out.histogram.len(), 7);
    }

    #[test]
    fn macd_line_is_aligned_difference() {
        let values = ramp(10);
        let out = macd(&values, 2, 4, 2);
        let fast = ema(&values, 2);
        let slow = ema(&values, 4);
        assert_eq!(out.macd_line.len(), slow.len());
        for (i, m) in out.macd_line.iter().enumerate() {
            assert_approx(*m, fast[i + 2] - slow[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let out = macd(&values, 12, 26, 9);
        let offset = out.macd_line.len() - out.signal_line.len();
        for (j, h) in out.histogram.iter().enumerate() {
            assert_approx(
                *h,
                out.macd_line[offset + j] - out.signal_line[j],
                DEFAULT_EPSILON,
            );
        }
    }

    #[test]
    fn constant_series_has_zero_macd() {
        let out = macd(&[50.0; 40], 12, 26, 9);
        for v in out.macd_line.iter().chain(&out.histogram) {
            assert_approx(*v, 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn too_short_for_signal_is_empty() {
        // 30 values → 5 MACD values, fewer than signal = 9
        let out = macd(&ramp(30), 12, 26, 9);
        assert!(out.is_empty());
        assert!(out.signal_line.is_empty());
        assert!(out.histogram.is_empty());
    }

    #[test]
    fn non_finite_is_empty() {
        let mut values = ramp(50);
        values[10] = f64::NAN;
        assert!(macd(&values, 12, 26, 9).is_empty());
    }

    #[test]
    fn default_params() {
        let m = Macd::default();
        assert_eq!(m.name(), "macd_12_26_9");
        assert_eq!(m.lookback(), 33);
        assert_eq!(m.compute(&ramp(34)).histogram.len(), 1);
    }
}
