//! Bull and bear flags.
//!
//! The last 10 candles split into a 5-candle pole and a 5-candle flag. The pole
//! must move sharply (up for a bull flag, down for a bear flag); the flag must
//! drift sideways in a tight range on lighter volume.

use crate::domain::{Candle, PatternDirection, PatternResult, PatternType};

use super::{anchor, PatternThresholds};

pub const FLAG_MIN_CANDLES: usize = 10;

const POLE_LEN: usize = 5;

pub fn detect(candles: &[Candle], t: &PatternThresholds) -> Option<PatternResult> {
    let n = candles.len();
    if n < FLAG_MIN_CANDLES {
        return None;
    }

    let pole = &candles[n - 2 * POLE_LEN..n - POLE_LEN];
    let flag = &candles[n - POLE_LEN..];

    let pole_move = relative_change(pole)?;
    let direction = if pole_move > t.flag_min_pole_move {
        PatternDirection::Bullish
    } else if pole_move < -t.flag_min_pole_move {
        PatternDirection::Bearish
    } else {
        return None;
    };

    let pole_volume = average_volume(pole)?;
    let flag_volume = average_volume(flag)?;
    if flag_volume >= pole_volume {
        return None;
    }

    let flag_slope = relative_change(flag)?;
    if flag_slope.abs() >= t.flag_max_slope {
        return None;
    }

    let flag_high = flag.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let flag_low = flag.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    if !(flag_low.is_finite() && flag_low > 0.0) {
        return None;
    }
    if (flag_high - flag_low) / flag_low >= t.flag_max_range {
        return None;
    }

    let pattern_type = match direction {
        PatternDirection::Bullish => PatternType::BullFlag,
        PatternDirection::Bearish => PatternType::BearFlag,
    };
    let confidence = t.flag_base_confidence + (pole_move.abs() - t.flag_min_pole_move);

    let (timestamp, price) = anchor(candles);
    Some(PatternResult::new(
        pattern_type,
        direction,
        confidence,
        timestamp,
        price,
    ))
}

/// Signed relative close change from the first to the last candle.
fn relative_change(window: &[Candle]) -> Option<f64> {
    let first = window.first()?.close;
    let last = window.last()?.close;
    if !(first.is_finite() && first > 0.0 && last.is_finite()) {
        return None;
    }
    Some((last - first) / first)
}

/// Mean volume; `None` unless every candle in the window reports volume.
fn average_volume(window: &[Candle]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    let mut sum = 0.0;
    for candle in window {
        sum += candle.volume?;
    }
    Some(sum / window.len() as f64)
}
