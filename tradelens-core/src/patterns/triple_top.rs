//! Triple top: bearish reversal.
//!
//! Exactly three strict local maxima of `high` within a tolerance of the
//! global maximum, spread far enough apart and nearly level with each other.

use crate::domain::{Candle, PatternDirection, PatternResult, PatternType};

use super::{anchor, PatternThresholds};

pub const TRIPLE_TOP_MIN_CANDLES: usize = 30;

pub fn detect(candles: &[Candle], t: &PatternThresholds) -> Option<PatternResult> {
    let n = candles.len();
    if n < TRIPLE_TOP_MIN_CANDLES {
        return None;
    }

    let global_max = candles
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);
    if !(global_max.is_finite() && global_max > 0.0) {
        return None;
    }

    let floor = global_max * (1.0 - t.triple_top_peak_tolerance);
    let peaks: Vec<(usize, f64)> = (1..n - 1)
        .filter(|&i| {
            let h = candles[i].high;
            h > candles[i - 1].high && h > candles[i + 1].high && h >= floor
        })
        .map(|i| (i, candles[i].high))
        .collect();

    if peaks.len() != 3 {
        return None;
    }

    let spacing = peaks[2].0 - peaks[0].0;
    if spacing < t.triple_top_min_spacing {
        return None;
    }

    let mut max_diff: f64 = 0.0;
    for a in 0..peaks.len() {
        for b in (a + 1)..peaks.len() {
            max_diff = max_diff.max((peaks[a].1 - peaks[b].1).abs());
        }
    }
    let symmetry = max_diff / global_max;
    if symmetry > t.triple_top_max_symmetry {
        return None;
    }

    let (timestamp, price) = anchor(candles);
    Some(PatternResult::new(
        PatternType::TripleTop,
        PatternDirection::Bearish,
        t.triple_top_base_confidence - symmetry * t.triple_top_symmetry_weight,
        timestamp,
        price,
    ))
}
