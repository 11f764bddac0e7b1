//! Trade: one broker transaction record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TradeId;

/// Transaction kind as reported by the broker.
///
/// Unknown action strings are kept verbatim in `Other` rather than rejected;
/// schema validation belongs upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TradeAction {
    Buy,
    Sell,
    Dividend,
    Interest,
    Deposit,
    Withdrawal,
    Fee,
    Other(String),
}

impl TradeAction {
    pub fn as_str(&self) -> &str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Dividend => "DIVIDEND",
            TradeAction::Interest => "INTEREST",
            TradeAction::Deposit => "DEPOSIT",
            TradeAction::Withdrawal => "WITHDRAWAL",
            TradeAction::Fee => "FEE",
            TradeAction::Other(s) => s,
        }
    }
}

impl FromStr for TradeAction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => TradeAction::Buy,
            "SELL" => TradeAction::Sell,
            "DIVIDEND" => TradeAction::Dividend,
            "INTEREST" => TradeAction::Interest,
            "DEPOSIT" => TradeAction::Deposit,
            "WITHDRAWAL" => TradeAction::Withdrawal,
            "FEE" => TradeAction::Fee,
            _ => TradeAction::Other(s.trim().to_string()),
        };
        Ok(action)
    }
}

impl TryFrom<String> for TradeAction {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TradeAction> for String {
    fn from(action: TradeAction) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single broker transaction.
///
/// `result` is the broker-supplied realized P&L, present on closing sells.
/// The stop/target and open/close fields are only populated by brokers that
/// export them; the distribution charts skip trades without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub ticker: String,
    pub action: TradeAction,
    pub quantity: f64,
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub fees: f64,
    #[serde(default)]
    pub result: Option<f64>,

    // ── Optional broker extras ──
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub open_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
}

impl Trade {
    /// Minimal constructor; optional extras start empty.
    pub fn new(
        id: impl Into<String>,
        ticker: impl Into<String>,
        action: TradeAction,
        quantity: f64,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TradeId::new(id),
            ticker: ticker.into(),
            action,
            quantity,
            price,
            currency: "USD".to_string(),
            timestamp,
            fees: 0.0,
            result: None,
            stop_loss: None,
            take_profit: None,
            open_time: None,
            close_time: None,
        }
    }

    pub fn with_result(mut self, result: f64) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_fees(mut self, fees: f64) -> Self {
        self.fees = fees;
        self
    }

    /// Gross notional: quantity × price.
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }

    /// The time the trade was opened: `open_time` when exported, else `timestamp`.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.open_time.unwrap_or(self.timestamp)
    }

    pub fn is_buy(&self) -> bool {
        self.action == TradeAction::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.action == TradeAction::Sell
    }
}
