//! Position lifecycle tracking.
//!
//! - `tracker`: the per-ticker state machine (OPEN → PARTIALLY_CLOSED → CLOSED)
//! - `arena`: multi-ticker book keyed by `(ticker, cycle)`
//! - `score`: the composite 0–100 position score

pub mod arena;
pub mod score;
pub mod tracker;

pub use arena::{split_by_ticker, PositionArena};
pub use score::{position_score, win_rate};
pub use tracker::{PositionLifecycleTracker, TrackOutcome, TrackerConfig, SHARE_EPSILON};
