//! Multi-ticker position book.
//!
//! Groups live in one flat arena indexed by `(ticker, cycle)`. A trade list
//! covering many tickers is split per ticker, each slice is stably sorted by
//! timestamp and run through the lifecycle tracker independently.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{GroupKey, PositionGroup, Trade, TradeId};

use super::tracker::{PositionLifecycleTracker, TrackOutcome};

/// Trades bucketed by ticker, each bucket in chronological order.
pub fn split_by_ticker(trades: &[Trade]) -> BTreeMap<&str, Vec<&Trade>> {
    let mut by_ticker: BTreeMap<&str, Vec<&Trade>> = BTreeMap::new();
    for trade in trades {
        by_ticker.entry(trade.ticker.as_str()).or_default().push(trade);
    }
    for bucket in by_ticker.values_mut() {
        bucket.sort_by_key(|t| t.timestamp);
    }
    by_ticker
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredArena")]
pub struct PositionArena {
    groups: Vec<PositionGroup>,
    #[serde(skip)]
    index: HashMap<GroupKey, usize>,
    orphans: Vec<TradeId>,
}

/// Serialized form; the key index is rebuilt on load.
#[derive(Deserialize)]
struct StoredArena {
    groups: Vec<PositionGroup>,
    #[serde(default)]
    orphans: Vec<TradeId>,
}

impl From<StoredArena> for PositionArena {
    fn from(stored: StoredArena) -> Self {
        Self::from_outcomes([TrackOutcome {
            groups: stored.groups,
            orphans: stored.orphans,
        }])
    }
}

impl PositionArena {
    /// Track every ticker in `trades`. `quotes` marks open positions.
    pub fn build(
        trades: &[Trade],
        tracker: &PositionLifecycleTracker,
        quotes: &HashMap<String, f64>,
    ) -> Self {
        let outcomes = split_by_ticker(trades)
            .into_iter()
            .map(|(ticker, bucket)| tracker.track(bucket, quotes.get(ticker).copied()));
        Self::from_outcomes(outcomes)
    }

    /// Assemble from per-ticker outcomes computed elsewhere. Groups end up
    /// ordered by key regardless of the order the outcomes arrive in.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = TrackOutcome>) -> Self {
        let mut groups = Vec::new();
        let mut orphans = Vec::new();
        for outcome in outcomes {
            groups.extend(outcome.groups);
            orphans.extend(outcome.orphans);
        }
        groups.sort_by(|a, b| a.key.cmp(&b.key));

        let index = groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.key.clone(), i))
            .collect();

        Self {
            groups,
            index,
            orphans,
        }
    }

    pub fn get(&self, key: &GroupKey) -> Option<&PositionGroup> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    pub fn groups(&self) -> &[PositionGroup] {
        &self.groups
    }

    /// All cycles of one ticker, oldest first.
    pub fn cycles<'a>(&'a self, ticker: &'a str) -> impl Iterator<Item = &'a PositionGroup> + 'a {
        self.groups.iter().filter(move |g| g.ticker() == ticker)
    }

    /// The most recent cycle of a ticker.
    pub fn latest<'a>(&'a self, ticker: &'a str) -> Option<&'a PositionGroup> {
        self.cycles(ticker).last()
    }

    /// Groups that still hold shares.
    pub fn open_groups(&self) -> impl Iterator<Item = &PositionGroup> {
        self.groups.iter().filter(|g| !g.is_closed())
    }

    pub fn orphans(&self) -> &[TradeId] {
        &self.orphans
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_parts(self) -> (Vec<PositionGroup>, Vec<TradeId>) {
        (self.groups, self.orphans)
    }
}
