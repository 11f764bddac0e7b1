//! Per-trade P&L models.
//!
//! Two definitions of "the P&L of a trade" exist in broker data: the realized
//! figure the broker reports on closing fills, and a cash-flow figure derived
//! from quantity and price. Components take a [`PnlModel`] so a caller picks one
//! explicitly instead of mixing them.

use serde::{Deserialize, Serialize};

use crate::domain::{Trade, TradeAction};

/// Which P&L definition to apply to a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PnlModel {
    /// Use the broker's `result` field; trades without one contribute 0.
    BrokerSupplied,
    /// Cash flow: `-quantity × price` for BUY, `+quantity × price` otherwise.
    Derived,
}

/// The P&L of a single trade under a chosen model.
#[derive(Debug, Clone, PartialEq)]
pub enum TradePnl {
    BrokerSupplied(Option<f64>),
    Derived {
        quantity: f64,
        price: f64,
        action: TradeAction,
    },
}

impl TradePnl {
    pub fn value(&self) -> f64 {
        match self {
            TradePnl::BrokerSupplied(result) => result.unwrap_or(0.0),
            TradePnl::Derived {
                quantity,
                price,
                action,
            } => {
                let signed_value = quantity * price;
                if *action == TradeAction::Buy {
                    -signed_value
                } else {
                    signed_value
                }
            }
        }
    }
}

impl PnlModel {
    pub fn extract(&self, trade: &Trade) -> TradePnl {
        match self {
            PnlModel::BrokerSupplied => TradePnl::BrokerSupplied(trade.result),
            PnlModel::Derived => TradePnl::Derived {
                quantity: trade.quantity,
                price: trade.price,
                action: trade.action.clone(),
            },
        }
    }

    /// Shorthand for `extract(trade).value()`.
    pub fn pnl(&self, trade: &Trade) -> f64 {
        self.extract(trade).value()
    }
}
