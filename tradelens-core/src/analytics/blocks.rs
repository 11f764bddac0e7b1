//! Individual analytics blocks: pure functions over a chronologically sorted
//! trade list and its per-trade P&L.
//!
//! Every function is independent of the others; the aggregator just calls them
//! in turn. Time-bucketed blocks render timestamps in a caller-chosen offset.

use chrono::{FixedOffset, Timelike};
use std::collections::BTreeMap;

use crate::domain::Trade;

use super::bundle::ChartSeries;

/// Running prefix sum of P&L, one point per trade.
pub fn equity_curve(trades: &[&Trade], pnls: &[f64], offset: &FixedOffset) -> ChartSeries {
    let mut series = ChartSeries::with_capacity(trades.len());
    let mut balance = 0.0;
    for (trade, pnl) in trades.iter().zip(pnls) {
        balance += pnl;
        let label = trade
            .timestamp
            .with_timezone(offset)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        series.push(label, balance);
    }
    series
}

/// Winning and losing trade counts. Break-even trades count in neither.
pub fn win_loss(pnls: &[f64]) -> ChartSeries {
    let wins = pnls.iter().filter(|&&p| p > 0.0).count();
    let losses = pnls.iter().filter(|&&p| p < 0.0).count();
    let mut series = ChartSeries::with_capacity(2);
    series.push("Wins", wins as f64);
    series.push("Losses", losses as f64);
    series
}

/// Histogram of `|quantity|` in fixed-width buckets labelled `"{lo}-{hi}"`.
///
/// Sizes beyond the `u64` range land in the highest representable bucket.
pub fn position_size_histogram(trades: &[&Trade], bucket_width: u64) -> ChartSeries {
    let width = bucket_width.max(1);
    let max_index = u64::MAX / width;
    let mut buckets: BTreeMap<u64, usize> = BTreeMap::new();
    for trade in trades {
        let size = trade.quantity.abs();
        if !size.is_finite() {
            continue;
        }
        // float-to-int casts saturate
        let index = ((size / width as f64).floor() as u64).min(max_index);
        *buckets.entry(index * width).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(lo, count)| (format!("{lo}-{}", lo.saturating_add(width - 1)), count as f64))
        .collect()
}

/// P&L summed per calendar day, chronological.
pub fn daily_performance(trades: &[&Trade], pnls: &[f64], offset: &FixedOffset) -> ChartSeries {
    sum_by_label(trades, pnls, offset, "%Y-%m-%d")
}

/// P&L summed per calendar month (`YYYY-MM`), chronological.
pub fn monthly_performance(trades: &[&Trade], pnls: &[f64], offset: &FixedOffset) -> ChartSeries {
    sum_by_label(trades, pnls, offset, "%Y-%m")
}

fn sum_by_label(
    trades: &[&Trade],
    pnls: &[f64],
    offset: &FixedOffset,
    format: &str,
) -> ChartSeries {
    // Zero-padded date keys sort chronologically as strings.
    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    for (trade, pnl) in trades.iter().zip(pnls) {
        let key = trade
            .timestamp
            .with_timezone(offset)
            .format(format)
            .to_string();
        *buckets.entry(key).or_default() += pnl;
    }
    buckets.into_iter().collect()
}

/// Histogram of reward/risk ratios, rounded to 2 decimals, ascending.
///
/// Only trades carrying both a stop-loss and a take-profit contribute; a stop
/// at the entry price (zero risk) is skipped.
pub fn risk_reward(trades: &[&Trade]) -> ChartSeries {
    let mut buckets: BTreeMap<i64, usize> = BTreeMap::new();
    for trade in trades {
        let (Some(stop), Some(target)) = (trade.stop_loss, trade.take_profit) else {
            continue;
        };
        let risk = (trade.price - stop).abs();
        let reward = (target - trade.price).abs();
        if risk == 0.0 || !risk.is_finite() || !reward.is_finite() {
            continue;
        }
        let hundredths = (reward / risk * 100.0).round() as i64;
        *buckets.entry(hundredths).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(hundredths, count)| (format!("{:.2}", hundredths as f64 / 100.0), count as f64))
        .collect()
}

/// Histogram of holding time in hour-wide buckets labelled `"{h}-{h+1}h"`.
///
/// Only trades carrying both open and close times contribute; negative
/// durations are skipped.
pub fn trade_duration(trades: &[&Trade]) -> ChartSeries {
    let mut buckets: BTreeMap<i64, usize> = BTreeMap::new();
    for trade in trades {
        let (Some(open), Some(close)) = (trade.open_time, trade.close_time) else {
            continue;
        };
        let minutes = (close - open).num_seconds() as f64 / 60.0;
        if minutes < 0.0 {
            continue;
        }
        let hour = (minutes / 60.0).floor() as i64;
        *buckets.entry(hour).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(h, count)| (format!("{h}-{}h", h + 1), count as f64))
        .collect()
}

/// Trade counts per local opening hour. Always 24 entries, `"00:00"`..`"23:00"`.
pub fn hourly_stats(trades: &[&Trade], offset: &FixedOffset) -> ChartSeries {
    let mut counts = [0usize; 24];
    for trade in trades {
        let hour = trade.opened_at().with_timezone(offset).hour() as usize;
        counts[hour] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(h, &count)| (format!("{h:02}:00"), count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeAction;
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn trade_at(qty: f64, y: i32, m: u32, d: u32, h: u32) -> Trade {
        Trade::new(
            format!("{y}{m}{d}{h}"),
            "AAPL",
            TradeAction::Buy,
            qty,
            10.0,
            Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
        )
    }

    #[test]
    fn position_size_buckets() {
        let trades = [
            trade_at(50.0, 2024, 1, 1, 10),
            trade_at(150.0, 2024, 1, 1, 10),
            trade_at(250.0, 2024, 1, 1, 10),
        ];
        let refs: Vec<&Trade> = trades.iter().collect();
        let series = position_size_histogram(&refs, 100);
        assert_eq!(series.labels, vec!["0-99", "100-199", "200-299"]);
        assert_eq!(series.values, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn position_size_buckets_sort_numerically() {
        let trades = [
            trade_at(1200.0, 2024, 1, 1, 10),
            trade_at(300.0, 2024, 1, 1, 10),
            trade_at(399.0, 2024, 1, 1, 10),
        ];
        let refs: Vec<&Trade> = trades.iter().collect();
        let series = position_size_histogram(&refs, 100);
        assert_eq!(series.labels, vec!["300-399", "1200-1299"]);
        assert_eq!(series.values, vec![2.0, 1.0]);
    }

    #[test]
    fn position_size_huge_quantity_lands_in_top_bucket() {
        let trades = [trade_at(1e20, 2024, 1, 1, 10), trade_at(f64::MAX, 2024, 1, 1, 10)];
        let refs: Vec<&Trade> = trades.iter().collect();
        let series = position_size_histogram(&refs, 100);
        assert_eq!(
            series.labels,
            vec!["18446744073709551600-18446744073709551615"]
        );
        assert_eq!(series.values, vec![2.0]);
    }

    #[test]
    fn win_loss_ignores_break_even() {
        let series = win_loss(&[10.0, -5.0, 0.0, 3.0]);
        assert_eq!(series.get("Wins"), Some(2.0));
        assert_eq!(series.get("Losses"), Some(1.0));
    }

    #[test]
    fn daily_and_monthly_sum_chronologically() {
        let trades = [
            trade_at(1.0, 2024, 2, 3, 10),
            trade_at(1.0, 2024, 1, 15, 10),
            trade_at(1.0, 2024, 1, 15, 12),
        ];
        let refs: Vec<&Trade> = trades.iter().collect();
        let pnls = [5.0, 1.0, 2.0];
        let daily = daily_performance(&refs, &pnls, &utc());
        assert_eq!(daily.labels, vec!["2024-01-15", "2024-02-03"]);
        assert_eq!(daily.values, vec![3.0, 5.0]);

        let monthly = monthly_performance(&refs, &pnls, &utc());
        assert_eq!(monthly.labels, vec!["2024-01", "2024-02"]);
        assert_eq!(monthly.values, vec![3.0, 5.0]);
    }

    #[test]
    fn offset_moves_day_boundary() {
        let trades = [trade_at(1.0, 2024, 1, 15, 23)];
        let refs: Vec<&Trade> = trades.iter().collect();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let daily = daily_performance(&refs, &[1.0], &plus_two);
        assert_eq!(daily.labels, vec!["2024-01-16"]);
        let hourly = hourly_stats(&refs, &plus_two);
        assert_eq!(hourly.get("01:00"), Some(1.0));
    }

    #[test]
    fn risk_reward_rounds_and_skips() {
        let mut a = trade_at(1.0, 2024, 1, 1, 10);
        a.stop_loss = Some(9.0);
        a.take_profit = Some(12.0); // 2 / 1
        let mut b = trade_at(1.0, 2024, 1, 1, 10);
        b.stop_loss = Some(7.0);
        b.take_profit = Some(14.0); // 4 / 3 = 1.333
        let mut zero_risk = trade_at(1.0, 2024, 1, 1, 10);
        zero_risk.stop_loss = Some(10.0);
        zero_risk.take_profit = Some(12.0);
        let no_stop = trade_at(1.0, 2024, 1, 1, 10);

        let trades = [a, b, zero_risk, no_stop];
        let refs: Vec<&Trade> = trades.iter().collect();
        let series = risk_reward(&refs);
        assert_eq!(series.labels, vec!["1.33", "2.00"]);
        assert_eq!(series.values, vec![1.0, 1.0]);
    }

    #[test]
    fn duration_buckets_by_hour() {
        let open = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let mut short = trade_at(1.0, 2024, 1, 1, 10);
        short.open_time = Some(open);
        short.close_time = Some(open + chrono::Duration::minutes(45));
        let mut long = trade_at(1.0, 2024, 1, 1, 10);
        long.open_time = Some(open);
        long.close_time = Some(open + chrono::Duration::minutes(150));
        let mut backwards = trade_at(1.0, 2024, 1, 1, 10);
        backwards.open_time = Some(open);
        backwards.close_time = Some(open - chrono::Duration::minutes(5));

        let trades = [short, long, backwards];
        let refs: Vec<&Trade> = trades.iter().collect();
        let series = trade_duration(&refs);
        assert_eq!(series.labels, vec!["0-1h", "2-3h"]);
        assert_eq!(series.values, vec![1.0, 1.0]);
    }

    #[test]
    fn hourly_always_has_24_entries() {
        let empty: Vec<&Trade> = Vec::new();
        let series = hourly_stats(&empty, &utc());
        assert_eq!(series.len(), 24);
        assert_eq!(series.labels[0], "00:00");
        assert_eq!(series.labels[23], "23:00");
        assert!(series.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn equity_curve_is_running_sum() {
        let trades = [
            trade_at(1.0, 2024, 1, 1, 10),
            trade_at(1.0, 2024, 1, 2, 10),
            trade_at(1.0, 2024, 1, 3, 10),
        ];
        let refs: Vec<&Trade> = trades.iter().collect();
        let series = equity_curve(&refs, &[-100.0, 150.0, 25.0], &utc());
        assert_eq!(series.values, vec![-100.0, 50.0, 75.0]);
        assert_eq!(series.labels[0], "2024-01-01 10:00:00");
    }
}
