//! Trade analytics aggregation.
//!
//! One call turns a raw, unordered trade list into the eight chart blocks of an
//! [`AnalyticsBundle`]. Trades are stably sorted by timestamp first; the
//! equity curve and the hourly histogram depend on that order.

pub mod blocks;
pub mod bundle;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Trade;
use crate::pnl::PnlModel;

pub use bundle::{AnalyticsBundle, ChartSeries};

/// Aggregator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// P&L definition applied to each trade.
    pub pnl_model: PnlModel,
    /// Offset used for calendar-day, month and hour labels.
    pub utc_offset_minutes: i32,
    /// Position-size histogram bucket width.
    pub position_bucket_width: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            pnl_model: PnlModel::Derived,
            utc_offset_minutes: 0,
            position_bucket_width: 100,
        }
    }
}

impl AggregatorConfig {
    /// The configured offset; out-of-range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Batch analytics over a trade list.
#[derive(Debug, Clone, Default)]
pub struct TradeAnalyticsAggregator {
    config: AggregatorConfig,
}

impl TradeAnalyticsAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Trades in chronological order; ties keep their input order.
    pub fn sorted<'a>(&self, trades: &'a [Trade]) -> Vec<&'a Trade> {
        let mut sorted: Vec<&Trade> = trades.iter().collect();
        sorted.sort_by_key(|t| t.timestamp);
        sorted
    }

    /// Per-trade P&L under the configured model, in the given order.
    pub fn pnls(&self, trades: &[&Trade]) -> Vec<f64> {
        trades
            .iter()
            .map(|t| self.config.pnl_model.pnl(t))
            .collect()
    }

    pub fn aggregate(&self, trades: &[Trade]) -> AnalyticsBundle {
        let sorted = self.sorted(trades);
        let pnls = self.pnls(&sorted);
        let offset = self.config.offset();

        debug!(
            trades = sorted.len(),
            model = ?self.config.pnl_model,
            "aggregating trade analytics"
        );

        AnalyticsBundle {
            equity_curve: blocks::equity_curve(&sorted, &pnls, &offset),
            win_loss: blocks::win_loss(&pnls),
            position_size: blocks::position_size_histogram(
                &sorted,
                self.config.position_bucket_width,
            ),
            daily_performance: blocks::daily_performance(&sorted, &pnls, &offset),
            monthly_performance: blocks::monthly_performance(&sorted, &pnls, &offset),
            risk_reward: blocks::risk_reward(&sorted),
            trade_duration: blocks::trade_duration(&sorted),
            hourly_stats: blocks::hourly_stats(&sorted, &offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeAction;
    use chrono::TimeZone;

    fn trade(id: &str, action: TradeAction, qty: f64, price: f64, day: u32) -> Trade {
        Trade::new(
            id,
            "AAPL",
            action,
            qty,
            price,
            Utc.with_ymd_and_hms(2024, 1, day, 15, 0, 0).unwrap(),
        )
    }

    #[test]
    fn aggregate_sorts_before_building_equity_curve() {
        let trades = vec![
            trade("sell", TradeAction::Sell, 10.0, 12.0, 5),
            trade("buy", TradeAction::Buy, 10.0, 10.0, 1),
        ];
        let bundle = TradeAnalyticsAggregator::default().aggregate(&trades);
        assert_eq!(bundle.equity_curve.values, vec![-100.0, 20.0]);
        assert_eq!(bundle.win_loss.values, vec![1.0, 1.0]);
    }

    #[test]
    fn aggregate_survives_huge_quantity() {
        let trades = vec![trade("big", TradeAction::Buy, 1e20, 1.0, 2)];
        let bundle = TradeAnalyticsAggregator::default().aggregate(&trades);
        assert_eq!(bundle.position_size.values, vec![1.0]);
        assert_eq!(bundle.hourly_stats.len(), 24);
    }

    #[test]
    fn stable_sort_keeps_input_order_on_ties() {
        let trades = vec![
            trade("a", TradeAction::Buy, 1.0, 1.0, 3),
            trade("b", TradeAction::Sell, 1.0, 5.0, 3),
        ];
        let agg = TradeAnalyticsAggregator::default();
        let sorted = agg.sorted(&trades);
        assert_eq!(sorted[0].id.0, "a");
        assert_eq!(sorted[1].id.0, "b");
    }

    #[test]
    fn empty_input_yields_empty_blocks_but_full_hours() {
        let bundle = TradeAnalyticsAggregator::default().aggregate(&[]);
        assert!(bundle.equity_curve.is_empty());
        assert!(bundle.position_size.is_empty());
        assert_eq!(bundle.win_loss.values, vec![0.0, 0.0]);
        assert_eq!(bundle.hourly_stats.len(), 24);
    }

    #[test]
    fn broker_model_uses_results() {
        let trades = vec![
            trade("buy", TradeAction::Buy, 10.0, 10.0, 1),
            trade("sell", TradeAction::Sell, 10.0, 12.0, 2).with_result(20.0),
        ];
        let agg = TradeAnalyticsAggregator::new(AggregatorConfig {
            pnl_model: PnlModel::BrokerSupplied,
            ..AggregatorConfig::default()
        });
        let bundle = agg.aggregate(&trades);
        assert_eq!(bundle.equity_curve.values, vec![0.0, 20.0]);
        assert_eq!(bundle.win_loss.values, vec![1.0, 0.0]);
    }

    #[test]
    fn out_of_range_offset_falls_back_to_utc() {
        let config = AggregatorConfig {
            utc_offset_minutes: 100_000,
            ..AggregatorConfig::default()
        };
        assert_eq!(config.offset().local_minus_utc(), 0);
    }
}
