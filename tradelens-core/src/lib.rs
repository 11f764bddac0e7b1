//! TradeLens Core: pure trading analytics.
//!
//! Nothing in this crate touches the filesystem or the network:
//! - Domain types (candles, trades, pattern results, position groups)
//! - Technical indicators (SMA, EMA, RSI, MACD)
//! - Chart pattern detection (cup and handle, flags, triple top)
//! - Trade analytics aggregation into chart-ready blocks
//! - Position lifecycle tracking and scoring

pub mod analytics;
pub mod domain;
pub mod indicators;
pub mod patterns;
pub mod pnl;
pub mod position;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed to worker threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<domain::PatternResult>();
        require_sync::<domain::PatternResult>();
        require_send::<domain::PositionGroup>();
        require_sync::<domain::PositionGroup>();
        require_send::<domain::GroupKey>();
        require_sync::<domain::GroupKey>();

        // Engines
        require_send::<indicators::IndicatorEngine>();
        require_sync::<indicators::IndicatorEngine>();
        require_send::<indicators::Macd>();
        require_sync::<indicators::Macd>();
        require_send::<patterns::PatternDetector>();
        require_sync::<patterns::PatternDetector>();
        require_send::<analytics::TradeAnalyticsAggregator>();
        require_sync::<analytics::TradeAnalyticsAggregator>();
        require_send::<analytics::AnalyticsBundle>();
        require_sync::<analytics::AnalyticsBundle>();
        require_send::<position::PositionLifecycleTracker>();
        require_sync::<position::PositionLifecycleTracker>();
        require_send::<position::PositionArena>();
        require_sync::<position::PositionArena>();
        require_send::<pnl::PnlModel>();
        require_sync::<pnl::PnlModel>();
    }

    /// Indicators are usable as trait objects across threads.
    #[test]
    fn indicator_trait_objects_build() {
        let boxed: Vec<Box<dyn indicators::Indicator>> = vec![
            Box::new(indicators::Sma::new(3)),
            Box::new(indicators::Ema::new(3)),
            Box::new(indicators::Rsi::new(3)),
        ];
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        for ind in &boxed {
            assert!(!ind.compute(&values).is_empty(), "{} produced nothing", ind.name());
        }
    }
}
