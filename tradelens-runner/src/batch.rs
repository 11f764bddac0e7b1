//! Parallel batch evaluation.
//!
//! Tickers are independent, so position tracking fans out one rayon task per
//! ticker and the arena re-sorts the results by key. Output is identical to
//! the sequential path whatever order the tasks finish in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::info;

use tradelens_core::domain::Trade;
use tradelens_core::position::{split_by_ticker, PositionArena, PositionLifecycleTracker};

/// Monotonic request counter.
///
/// A caller takes a new generation when it issues a request and, when the
/// result comes back, drops it unless its generation is still the latest.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request; everything issued before it becomes stale.
    pub fn advance(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// Track every ticker in parallel.
pub fn track_positions(
    trades: &[Trade],
    tracker: &PositionLifecycleTracker,
    quotes: &HashMap<String, f64>,
) -> PositionArena {
    let buckets: Vec<_> = split_by_ticker(trades).into_iter().collect();
    info!(tickers = buckets.len(), trades = trades.len(), "tracking positions");

    let outcomes: Vec<_> = buckets
        .into_par_iter()
        .map(|(ticker, bucket)| tracker.track(bucket, quotes.get(ticker).copied()))
        .collect();

    PositionArena::from_outcomes(outcomes)
}
