//! Headline statistics over a trade list.
//!
//! All functions are pure: they take per-trade P&L in chronological order
//! (or a finished bundle) and return a scalar.

use serde::{Deserialize, Serialize};

use tradelens_core::analytics::{AnalyticsBundle, ChartSeries};

/// One labelled day of P&L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPnl {
    pub day: String,
    pub pnl: f64,
}

/// Headline numbers for a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub trade_count: usize,
    pub total_pnl: f64,
    /// Winning trades as a percentage of all trades.
    pub win_rate: f64,
    /// Gross profit / gross loss, capped at 100.
    pub profit_factor: f64,
    /// Largest peak-to-trough fall of the equity curve, as a non-positive amount.
    pub max_drawdown: f64,
    pub best_day: Option<DayPnl>,
    pub worst_day: Option<DayPnl>,
}

impl TradeSummary {
    /// `pnls` must be the per-trade P&L the bundle was built from.
    pub fn compute(bundle: &AnalyticsBundle, pnls: &[f64]) -> Self {
        Self {
            trade_count: pnls.len(),
            total_pnl: pnls.iter().sum(),
            win_rate: win_rate(pnls),
            profit_factor: profit_factor(pnls),
            max_drawdown: max_drawdown(&bundle.equity_curve.values),
            best_day: extreme_day(&bundle.daily_performance, |a, b| a > b),
            worst_day: extreme_day(&bundle.daily_performance, |a, b| a < b),
        }
    }
}

/// Winning trades as a percentage of all trades.
pub fn win_rate(pnls: &[f64]) -> f64 {
    if pnls.is_empty() {
        return 0.0;
    }
    let winners = pnls.iter().filter(|&&p| p > 0.0).count();
    winners as f64 / pnls.len() as f64 * 100.0
}

/// Profit factor: gross profits / gross losses.
///
/// Capped at 100.0 for edge cases (all winners, zero losses).
pub fn profit_factor(pnls: &[f64]) -> f64 {
    if pnls.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = pnls.iter().filter(|&&p| p > 0.0).sum();
    let gross_loss: f64 = pnls.iter().filter(|&&p| p < 0.0).map(|p| p.abs()).sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

/// Maximum drawdown in currency units (e.g. -250.0).
///
/// The curve starts from a zero balance, so an initial loss counts as a
/// drawdown. Returns 0.0 if equity never falls below a previous peak.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for &eq in equity_curve {
        if eq > peak {
            peak = eq;
        }
        let dd = eq - peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

fn extreme_day(daily: &ChartSeries, better: impl Fn(f64, f64) -> bool) -> Option<DayPnl> {
    let mut best: Option<(&str, f64)> = None;
    for (day, pnl) in daily.iter() {
        match best {
            Some((_, current)) if !better(pnl, current) => {}
            _ => best = Some((day, pnl)),
        }
    }
    best.map(|(day, pnl)| DayPnl {
        day: day.to_string(),
        pnl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_rate_and_profit_factor() {
        let pnls = [100.0, -50.0, 25.0, 0.0];
        assert_eq!(win_rate(&pnls), 50.0);
        assert!((profit_factor(&pnls) - 2.5).abs() < 1e-10);
        assert_eq!(win_rate(&[]), 0.0);
        assert_eq!(profit_factor(&[]), 0.0);
    }

    #[test]
    fn profit_factor_caps_without_losses() {
        assert_eq!(profit_factor(&[10.0, 20.0]), 100.0);
        assert_eq!(profit_factor(&[0.0]), 0.0);
    }

    #[test]
    fn drawdown_from_running_peak() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[10.0, 20.0, 30.0]), 0.0);
        assert_eq!(max_drawdown(&[100.0, 40.0, 150.0, 120.0]), -60.0);
        assert_eq!(max_drawdown(&[-30.0, -10.0]), -30.0);
    }

    #[test]
    fn best_and_worst_days() {
        let mut bundle = AnalyticsBundle::default();
        bundle.daily_performance =
            vec![("2024-01-01", 5.0), ("2024-01-02", -8.0), ("2024-01-03", 12.0)]
                .into_iter()
                .collect();
        bundle.equity_curve = vec![("a", 5.0), ("b", -3.0), ("c", 9.0)].into_iter().collect();

        let summary = TradeSummary::compute(&bundle, &[5.0, -8.0, 12.0]);
        assert_eq!(summary.trade_count, 3);
        assert_eq!(summary.total_pnl, 9.0);
        assert_eq!(summary.best_day.unwrap().day, "2024-01-03");
        assert_eq!(summary.worst_day.unwrap().pnl, -8.0);
        assert_eq!(summary.max_drawdown, -8.0);
    }

    #[test]
    fn empty_bundle_has_no_days() {
        let summary = TradeSummary::compute(&AnalyticsBundle::default(), &[]);
        assert_eq!(summary, TradeSummary::default());
    }
}
