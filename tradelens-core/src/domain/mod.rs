//! Domain types for TradeLens

pub mod candle;
pub mod ids;
pub mod pattern;
pub mod position;
pub mod trade;

pub use candle::{closes, Candle};
pub use ids::{GroupKey, TradeId};
pub use pattern::{PatternDirection, PatternResult, PatternType};
pub use position::{PositionGroup, PositionStatus, PositionSummary};
pub use trade::{Trade, TradeAction};

/// Ticker type alias
pub type Ticker = String;
