//! Position lifecycle state machine.
//!
//! A group instance starts OPEN at its first BUY, moves to PARTIALLY_CLOSED
//! on the first SELL, and ends CLOSED when every bought share has been sold.
//! It never moves backward: a BUY arriving after closure opens the next cycle
//! as a new instance and the closed one is frozen.
//!
//! Invariant: `total_buy_shares - net_shares == total_sell_shares`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    GroupKey, PositionGroup, PositionStatus, PositionSummary, Trade, TradeAction, TradeId,
};
use crate::pnl::PnlModel;

use super::score::{position_score, win_rate};

/// Share counts closer to zero than this are treated as exactly zero.
pub const SHARE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// P&L definition applied to SELLs.
    pub pnl_model: PnlModel,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            pnl_model: PnlModel::BrokerSupplied,
        }
    }
}

/// Groups produced from one ticker's trades, plus trades that had no open
/// group to attach to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackOutcome {
    pub groups: Vec<PositionGroup>,
    pub orphans: Vec<TradeId>,
}

/// Running accounting for one group instance.
#[derive(Debug, Clone)]
struct GroupState {
    key: GroupKey,
    net_shares: f64,
    buy_value: f64,
    buy_shares: f64,
    sell_value: f64,
    sell_shares: f64,
    realized_pnl: f64,
    running_pnl: f64,
    total_fees: f64,
    total_dividends: f64,
    winning_trades: u32,
    closed_trades: u32,
    first_ts: DateTime<Utc>,
    last_ts: DateTime<Utc>,
    last_price: Option<f64>,
    trade_ids: Vec<TradeId>,
}

impl GroupState {
    fn open(key: GroupKey, first: &Trade) -> Self {
        Self {
            key,
            net_shares: 0.0,
            buy_value: 0.0,
            buy_shares: 0.0,
            sell_value: 0.0,
            sell_shares: 0.0,
            realized_pnl: 0.0,
            running_pnl: 0.0,
            total_fees: 0.0,
            total_dividends: 0.0,
            winning_trades: 0,
            closed_trades: 0,
            first_ts: first.timestamp,
            last_ts: first.timestamp,
            last_price: None,
            trade_ids: Vec::new(),
        }
    }

    fn apply(&mut self, trade: &Trade, model: PnlModel) {
        self.total_fees += trade.fees;
        self.last_ts = trade.timestamp;
        self.trade_ids.push(trade.id.clone());

        match trade.action {
            TradeAction::Buy => {
                self.net_shares += trade.quantity;
                self.buy_shares += trade.quantity;
                self.buy_value += trade.notional();
                self.last_price = Some(trade.price);
            }
            TradeAction::Sell => {
                let mut quantity = trade.quantity;
                if quantity > self.net_shares + SHARE_EPSILON {
                    warn!(
                        group = %self.key,
                        trade = %trade.id,
                        requested = trade.quantity,
                        held = self.net_shares,
                        "sell exceeds held shares; clamping to position size"
                    );
                    quantity = self.net_shares;
                }
                self.net_shares -= quantity;
                if self.net_shares.abs() < SHARE_EPSILON {
                    self.net_shares = 0.0;
                }
                self.sell_shares += quantity;
                self.sell_value += quantity * trade.price;
                self.last_price = Some(trade.price);

                let pnl = model.pnl(trade);
                self.realized_pnl += pnl;
                self.running_pnl += pnl;

                // a cycle that never held shares has nothing to close
                if self.net_shares == 0.0 && self.buy_shares > 0.0 {
                    self.closed_trades += 1;
                    if self.running_pnl > 0.0 {
                        self.winning_trades += 1;
                    }
                    debug!(group = %self.key, pnl = self.running_pnl, "position closed");
                }
            }
            TradeAction::Dividend => {
                let amount = trade.result.unwrap_or_else(|| trade.notional());
                self.total_dividends += amount;
                self.running_pnl += amount;
            }
            // Interest, cash movements and fee-only rows only contribute fees.
            _ => {}
        }
    }

    fn percent_closed(&self) -> f64 {
        if self.buy_shares <= 0.0 {
            return 0.0;
        }
        ((self.buy_shares - self.net_shares) / self.buy_shares * 100.0).clamp(0.0, 100.0)
    }

    fn status(&self) -> PositionStatus {
        PositionStatus::from_percent_closed(self.percent_closed())
    }

    fn is_closed(&self) -> bool {
        self.status() == PositionStatus::Closed
    }

    fn avg_entry_price(&self) -> f64 {
        if self.buy_shares > 0.0 {
            self.buy_value / self.buy_shares
        } else {
            0.0
        }
    }

    fn avg_exit_price(&self) -> f64 {
        if self.sell_shares > 0.0 {
            self.sell_value / self.sell_shares
        } else {
            0.0
        }
    }

    /// Freeze the current state. `quote` overrides the last trade price as
    /// the mark for unrealized P&L.
    fn snapshot(&self, quote: Option<f64>) -> PositionGroup {
        let avg_entry_price = self.avg_entry_price();
        let unrealized_pnl = if self.net_shares > 0.0 {
            let mark = quote.or(self.last_price).unwrap_or(avg_entry_price);
            self.net_shares * (mark - avg_entry_price)
        } else {
            0.0
        };

        let percent_closed = self.percent_closed();
        let holding_period_hours =
            (self.last_ts - self.first_ts).num_milliseconds() as f64 / 3_600_000.0;

        PositionGroup {
            key: self.key.clone(),
            net_shares: self.net_shares,
            total_buy_shares: self.buy_shares,
            total_sell_shares: self.sell_shares,
            realized_pnl: self.realized_pnl,
            unrealized_pnl,
            total_fees: self.total_fees,
            total_dividends: self.total_dividends,
            percent_closed,
            status: self.status(),
            summary: PositionSummary {
                score: position_score(
                    self.realized_pnl + unrealized_pnl,
                    holding_period_hours,
                    percent_closed,
                ),
                win_rate: win_rate(self.winning_trades, self.closed_trades),
                holding_period_hours,
                avg_entry_price,
                avg_exit_price: self.avg_exit_price(),
            },
            trade_ids: self.trade_ids.clone(),
        }
    }
}

/// Turns one ticker's chronological trades into position group snapshots.
#[derive(Debug, Clone, Default)]
pub struct PositionLifecycleTracker {
    config: TrackerConfig,
}

impl PositionLifecycleTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Track trades already sorted by timestamp and belonging to one ticker.
    ///
    /// Every cycle becomes its own group. `quote`, when given, marks the last
    /// group's remaining shares; earlier cycles are closed and carry no
    /// unrealized P&L.
    pub fn track<'a, I>(&self, trades: I, quote: Option<f64>) -> TrackOutcome
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let model = self.config.pnl_model;
        let mut outcome = TrackOutcome::default();
        let mut current: Option<GroupState> = None;
        let mut next_cycle: u32 = 0;

        for trade in trades {
            match trade.action {
                TradeAction::Buy => {
                    let reopen = current.as_ref().map_or(true, GroupState::is_closed);
                    if reopen {
                        if let Some(done) = current.take() {
                            outcome.groups.push(done.snapshot(None));
                        }
                        let key = GroupKey::new(trade.ticker.clone(), next_cycle);
                        next_cycle += 1;
                        debug!(group = %key, "opening position cycle");
                        current = Some(GroupState::open(key, trade));
                    }
                    if let Some(state) = current.as_mut() {
                        state.apply(trade, model);
                    }
                }
                TradeAction::Sell => match current.as_mut() {
                    Some(state) if !state.is_closed() => state.apply(trade, model),
                    _ => {
                        warn!(trade = %trade.id, ticker = %trade.ticker, "sell without an open position");
                        outcome.orphans.push(trade.id.clone());
                    }
                },
                _ => match current.as_mut() {
                    Some(state) => state.apply(trade, model),
                    None => {
                        debug!(trade = %trade.id, action = %trade.action, "no position to attach to");
                        outcome.orphans.push(trade.id.clone());
                    }
                },
            }
        }

        if let Some(state) = current {
            outcome.groups.push(state.snapshot(quote));
        }
        outcome
    }
}
