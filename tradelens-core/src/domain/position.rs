//! PositionGroup: accounting snapshot for one long cycle of a ticker.

use serde::{Deserialize, Serialize};

use super::ids::{GroupKey, TradeId};

/// Lifecycle status. Transitions only move forward within one group instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    PartiallyClosed,
    Closed,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Open => "OPEN",
            PositionStatus::PartiallyClosed => "PARTIALLY_CLOSED",
            PositionStatus::Closed => "CLOSED",
        }
    }

    /// Status implied by a closure percentage.
    pub fn from_percent_closed(percent_closed: f64) -> Self {
        if percent_closed >= 100.0 {
            PositionStatus::Closed
        } else if percent_closed > 0.0 {
            PositionStatus::PartiallyClosed
        } else {
            PositionStatus::Open
        }
    }
}

/// Derived performance summary for a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSummary {
    /// Composite score in [0, 100].
    pub score: u8,
    /// Percentage of closed round trips that finished in profit, in [0, 100].
    pub win_rate: f64,
    pub holding_period_hours: f64,
    pub avg_entry_price: f64,
    pub avg_exit_price: f64,
}

/// One position group instance.
///
/// Snapshots are never reopened: a BUY after closure produces a new group
/// with the next cycle index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionGroup {
    pub key: GroupKey,
    pub net_shares: f64,
    pub total_buy_shares: f64,
    pub total_sell_shares: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_fees: f64,
    pub total_dividends: f64,
    pub percent_closed: f64,
    pub status: PositionStatus,
    pub summary: PositionSummary,
    pub trade_ids: Vec<TradeId>,
}

impl PositionGroup {
    pub fn ticker(&self) -> &str {
        &self.key.ticker
    }

    pub fn is_closed(&self) -> bool {
        self.status == PositionStatus::Closed
    }

    /// Realized plus unrealized P&L.
    pub fn total_pnl(&self) -> f64 {
        self.realized_pnl + self.unrealized_pnl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_percent_closed() {
        assert_eq!(PositionStatus::from_percent_closed(0.0), PositionStatus::Open);
        assert_eq!(
            PositionStatus::from_percent_closed(0.5),
            PositionStatus::PartiallyClosed
        );
        assert_eq!(
            PositionStatus::from_percent_closed(99.9),
            PositionStatus::PartiallyClosed
        );
        assert_eq!(
            PositionStatus::from_percent_closed(100.0),
            PositionStatus::Closed
        );
    }

    #[test]
    fn status_names_match_wire_format() {
        for status in [
            PositionStatus::Open,
            PositionStatus::PartiallyClosed,
            PositionStatus::Closed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn status_orders_forward() {
        assert!(PositionStatus::Open < PositionStatus::PartiallyClosed);
        assert!(PositionStatus::PartiallyClosed < PositionStatus::Closed);
    }
}
