//! PatternResult: a chart-pattern match emitted by a detector.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    CupAndHandle,
    BullFlag,
    BearFlag,
    TripleTop,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::CupAndHandle => "CUP_AND_HANDLE",
            PatternType::BullFlag => "BULL_FLAG",
            PatternType::BearFlag => "BEAR_FLAG",
            PatternType::TripleTop => "TRIPLE_TOP",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternDirection {
    Bullish,
    Bearish,
}

/// A detected chart pattern.
///
/// `timestamp` and `price` are taken from the last candle the detector saw.
/// Confidence is a heuristic match strength in [0, 1], not a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternResult {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub direction: PatternDirection,
    pub confidence: f64,
    pub timestamp: i64,
    pub price: f64,
}

impl PatternResult {
    /// Build a result, clamping `confidence` into [0, 1].
    pub fn new(
        pattern_type: PatternType,
        direction: PatternDirection,
        confidence: f64,
        timestamp: i64,
        price: f64,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            pattern_type,
            direction,
            confidence,
            timestamp,
            price,
        }
    }
}
