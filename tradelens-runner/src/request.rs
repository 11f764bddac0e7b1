//! Request/report pairs at the component boundaries.
//!
//! Each request owns its inputs so it can cross a thread or a process
//! boundary as JSON; each `run_*` function builds the component fresh.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use tradelens_core::analytics::{AggregatorConfig, AnalyticsBundle, TradeAnalyticsAggregator};
use tradelens_core::domain::{closes, Candle, PatternResult, PositionGroup, Trade, TradeId};
use tradelens_core::indicators::{IndicatorEngine, MacdOutput};
use tradelens_core::patterns::{PatternDetector, PatternThresholds};
use tradelens_core::position::{PositionArena, PositionLifecycleTracker, TrackerConfig};

use crate::config::IndicatorOptions;

// ─── Indicators and patterns ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    pub candles: Vec<Candle>,
    #[serde(default)]
    pub options: IndicatorOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    /// One series per requested period, keyed `sma_{period}`.
    pub sma: BTreeMap<String, Vec<f64>>,
    pub rsi: Vec<f64>,
    pub macd: MacdOutput,
    pub patterns: Vec<PatternResult>,
}

pub fn run_indicator_request(
    request: &IndicatorRequest,
    thresholds: &PatternThresholds,
) -> IndicatorReport {
    let engine = IndicatorEngine::new();
    let values = closes(&request.candles);
    let opts = &request.options;

    let sma = opts
        .sma
        .iter()
        .map(|&period| (format!("sma_{period}"), engine.sma(&values, period)))
        .collect();
    let rsi = engine.rsi(&values, opts.rsi);
    let macd = engine.macd(&values, opts.macd.fast, opts.macd.slow, opts.macd.signal);

    let patterns = if opts.patterns {
        PatternDetector::with_thresholds(thresholds.clone()).detect_all(&request.candles)
    } else {
        Vec::new()
    };

    debug!(
        candles = request.candles.len(),
        patterns = patterns.len(),
        "indicator request complete"
    );

    IndicatorReport {
        sma,
        rsi,
        macd,
        patterns,
    }
}

// ─── Trade analytics ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    pub trades: Vec<Trade>,
}

pub fn run_analytics_request(request: &AnalyticsRequest, config: &AggregatorConfig) -> AnalyticsBundle {
    TradeAnalyticsAggregator::new(config.clone()).aggregate(&request.trades)
}

// ─── Positions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionsRequest {
    pub trades: Vec<Trade>,
    /// Latest price per ticker, used to mark open positions.
    #[serde(default)]
    pub quotes: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionsReport {
    /// Ordered by `(ticker, cycle)`.
    pub groups: Vec<PositionGroup>,
    /// Trades that had no open group to attach to.
    pub orphans: Vec<TradeId>,
}

impl From<PositionArena> for PositionsReport {
    fn from(arena: PositionArena) -> Self {
        let (groups, orphans) = arena.into_parts();
        Self { groups, orphans }
    }
}

/// Sequential position tracking. See [`crate::batch::track_positions`] for
/// the parallel version.
pub fn run_positions_request(request: &PositionsRequest, config: &TrackerConfig) -> PositionsReport {
    let tracker = PositionLifecycleTracker::new(config.clone());
    PositionArena::build(&request.trades, &tracker, &request.quotes).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tradelens_core::domain::{PositionStatus, TradeAction};

    fn candle_series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle {
                    timestamp: i as i64 * 60_000,
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: None,
                }
            })
            .collect()
    }

    #[test]
    fn indicator_report_keys_sma_by_period() {
        let request = IndicatorRequest {
            candles: candle_series(60),
            options: IndicatorOptions {
                sma: vec![5, 20],
                ..IndicatorOptions::default()
            },
        };
        let report = run_indicator_request(&request, &PatternThresholds::default());
        assert_eq!(report.sma.len(), 2);
        assert_eq!(report.sma["sma_5"].len(), 56);
        assert_eq!(report.sma["sma_20"].len(), 41);
        assert_eq!(report.rsi.len(), 46);
        assert!(report.rsi.iter().all(|&v| v > 99.0));
        assert!(!report.macd.is_empty());
    }

    #[test]
    fn short_series_yields_empty_indicators() {
        let request = IndicatorRequest {
            candles: candle_series(3),
            options: IndicatorOptions::default(),
        };
        let report = run_indicator_request(&request, &PatternThresholds::default());
        assert!(report.sma.values().all(Vec::is_empty));
        assert!(report.rsi.is_empty());
        assert!(report.macd.is_empty());
        assert!(report.patterns.is_empty());
    }

    #[test]
    fn request_accepts_json_without_options() {
        let json = r#"{"candles":[{"timestamp":0,"open":1,"high":1,"low":1,"close":1}]}"#;
        let request: IndicatorRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.options, IndicatorOptions::default());
        assert_eq!(request.candles[0].volume, None);
    }

    #[test]
    fn positions_request_marks_with_quotes() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 15, 0, 0).unwrap();
        let request = PositionsRequest {
            trades: vec![
                Trade::new("1", "AAPL", TradeAction::Buy, 10.0, 100.0, ts),
                Trade::new("2", "MSFT", TradeAction::Sell, 1.0, 300.0, ts),
            ],
            quotes: HashMap::from([("AAPL".to_string(), 105.0)]),
        };
        let report = run_positions_request(&request, &TrackerConfig::default());
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].status, PositionStatus::Open);
        assert_eq!(report.groups[0].unrealized_pnl, 50.0);
        assert_eq!(report.orphans, vec![TradeId::new("2")]);
    }
}
