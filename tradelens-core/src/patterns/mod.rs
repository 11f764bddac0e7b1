//! Heuristic chart-pattern detectors.
//!
//! Each detector inspects a candle slice and returns at most one match. Below a
//! fixed minimum length a detector returns `None`; short input is not an error.
//! Thresholds are tunable through [`PatternThresholds`]; confidences are clamped
//! to [0, 1] when the result is built.

pub mod cup_and_handle;
pub mod flag;
pub mod triple_top;

use serde::{Deserialize, Serialize};

use crate::domain::{Candle, PatternDirection, PatternResult};

pub use cup_and_handle::CUP_MIN_CANDLES;
pub use flag::FLAG_MIN_CANDLES;
pub use triple_top::TRIPLE_TOP_MIN_CANDLES;

/// Tunable detector thresholds. `Default` holds the reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternThresholds {
    // ── Cup and handle ──
    pub cup_min_depth: f64,
    pub cup_max_depth: f64,
    pub cup_max_symmetry: f64,
    pub handle_min_retrace: f64,
    pub handle_max_retrace: f64,
    pub cup_base_confidence: f64,

    // ── Flags ──
    pub flag_min_pole_move: f64,
    pub flag_max_slope: f64,
    pub flag_max_range: f64,
    pub flag_base_confidence: f64,

    // ── Triple top ──
    pub triple_top_peak_tolerance: f64,
    pub triple_top_min_spacing: usize,
    pub triple_top_max_symmetry: f64,
    pub triple_top_base_confidence: f64,
    pub triple_top_symmetry_weight: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            cup_min_depth: 0.15,
            cup_max_depth: 0.45,
            cup_max_symmetry: 0.10,
            handle_min_retrace: 0.10,
            handle_max_retrace: 0.25,
            cup_base_confidence: 0.8,

            flag_min_pole_move: 0.10,
            flag_max_slope: 0.05,
            flag_max_range: 0.10,
            flag_base_confidence: 0.7,

            triple_top_peak_tolerance: 0.02,
            triple_top_min_spacing: 10,
            triple_top_max_symmetry: 0.02,
            triple_top_base_confidence: 0.8,
            triple_top_symmetry_weight: 10.0,
        }
    }
}

/// Runs the individual detectors with one set of thresholds.
///
/// Construct one per caller; it holds no state beyond its thresholds.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    thresholds: PatternThresholds,
}

impl PatternDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: PatternThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PatternThresholds {
        &self.thresholds
    }

    pub fn detect_cup_and_handle(&self, candles: &[Candle]) -> Option<PatternResult> {
        cup_and_handle::detect(candles, &self.thresholds)
    }

    /// Bull or bear flag, whichever the pole direction implies.
    pub fn detect_flag(&self, candles: &[Candle]) -> Option<PatternResult> {
        flag::detect(candles, &self.thresholds)
    }

    pub fn detect_bull_flag(&self, candles: &[Candle]) -> Option<PatternResult> {
        self.detect_flag(candles)
            .filter(|r| r.direction == PatternDirection::Bullish)
    }

    pub fn detect_bear_flag(&self, candles: &[Candle]) -> Option<PatternResult> {
        self.detect_flag(candles)
            .filter(|r| r.direction == PatternDirection::Bearish)
    }

    pub fn detect_triple_top(&self, candles: &[Candle]) -> Option<PatternResult> {
        triple_top::detect(candles, &self.thresholds)
    }

    /// Run every detector; matches in a fixed order (cup, flag, triple top).
    pub fn detect_all(&self, candles: &[Candle]) -> Vec<PatternResult> {
        [
            self.detect_cup_and_handle(candles),
            self.detect_flag(candles),
            self.detect_triple_top(candles),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Timestamp and close of the last candle. Callers guarantee non-empty input.
pub(crate) fn anchor(candles: &[Candle]) -> (i64, f64) {
    let last = &candles[candles.len() - 1];
    (last.timestamp, last.close)
}

/// Build synthetic candles from closes for testing.
///
/// high = close + 0.5, low = close - 0.5, open = previous close, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: 1_704_067_200_000 + i as i64 * 86_400_000,
            open: if i == 0 { close } else { closes[i - 1] },
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: Some(1000.0),
        })
        .collect()
}
