use serde::{Deserialize, Serialize};
use std::fmt;

/// Broker-assigned trade identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(pub String);

impl TradeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position group key: one long cycle of one ticker.
///
/// Cycle 0 is the first BUY ever seen for the ticker; each BUY after a full
/// closure opens the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub ticker: String,
    pub cycle: u32,
}

impl GroupKey {
    pub fn new(ticker: impl Into<String>, cycle: u32) -> Self {
        Self {
            ticker: ticker.into(),
            cycle,
        }
    }

    pub fn next_cycle(&self) -> Self {
        Self {
            ticker: self.ticker.clone(),
            cycle: self.cycle + 1,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.ticker, self.cycle)
    }
}
