//! Cup and handle: bullish continuation.
//!
//! Left rim: highest close of the first 10 candles. Cup bottom: lowest close of
//! candles 10..20. Right rim: close 10 candles before the end. Handle: last close.
//! The cup must be deep enough but not too deep, the rims roughly level, and the
//! handle a modest pullback from the right rim.

use crate::domain::{Candle, PatternDirection, PatternResult, PatternType};

use super::{anchor, PatternThresholds};

pub const CUP_MIN_CANDLES: usize = 30;

const RIM_WINDOW: usize = 10;

pub fn detect(candles: &[Candle], t: &PatternThresholds) -> Option<PatternResult> {
    let n = candles.len();
    if n < CUP_MIN_CANDLES {
        return None;
    }

    let left_rim_max = candles[..RIM_WINDOW]
        .iter()
        .map(|c| c.close)
        .fold(f64::NEG_INFINITY, f64::max);
    let cup_bottom_min = candles[RIM_WINDOW..2 * RIM_WINDOW]
        .iter()
        .map(|c| c.close)
        .fold(f64::INFINITY, f64::min);
    let right_rim_close = candles[n - RIM_WINDOW].close;
    let handle_close = candles[n - 1].close;

    if !(left_rim_max.is_finite() && left_rim_max > 0.0)
        || !(right_rim_close.is_finite() && right_rim_close > 0.0)
    {
        return None;
    }

    let cup_depth = (left_rim_max - cup_bottom_min) / left_rim_max;
    let cup_symmetry = (right_rim_close - left_rim_max).abs() / left_rim_max;
    let handle_retrace = (right_rim_close - handle_close) / right_rim_close;

    let depth_ok = (t.cup_min_depth..=t.cup_max_depth).contains(&cup_depth);
    let symmetry_ok = cup_symmetry <= t.cup_max_symmetry;
    let handle_ok = (t.handle_min_retrace..=t.handle_max_retrace).contains(&handle_retrace);
    if !(depth_ok && symmetry_ok && handle_ok) {
        return None;
    }

    let (timestamp, price) = anchor(candles);
    Some(PatternResult::new(
        PatternType::CupAndHandle,
        PatternDirection::Bullish,
        t.cup_base_confidence - cup_symmetry,
        timestamp,
        price,
    ))
}
