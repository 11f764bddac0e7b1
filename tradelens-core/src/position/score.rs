//! Composite position score (0–100).
//!
//! Three components:
//! - profit: up to 50 points, 10 per $1,000 of total P&L, 0 when not profitable
//! - holding period: shorter holds score higher (25 / 15 / 10 / 5)
//! - closure: how much of the position has been exited (25 / 20 / 15 / 10 / 0)

const HOURS_PER_DAY: f64 = 24.0;

pub fn profit_component(total_pnl: f64) -> f64 {
    if total_pnl > 0.0 {
        (total_pnl / 1000.0 * 10.0).min(50.0)
    } else {
        0.0
    }
}

pub fn holding_component(holding_period_hours: f64) -> f64 {
    let days = holding_period_hours / HOURS_PER_DAY;
    if days <= 5.0 {
        25.0
    } else if days <= 10.0 {
        15.0
    } else if days <= 20.0 {
        10.0
    } else {
        5.0
    }
}

pub fn closure_component(percent_closed: f64) -> f64 {
    if percent_closed >= 100.0 {
        25.0
    } else if percent_closed >= 75.0 {
        20.0
    } else if percent_closed >= 50.0 {
        15.0
    } else if percent_closed > 0.0 {
        10.0
    } else {
        0.0
    }
}

/// Rounded sum of the three components, clamped to [0, 100].
pub fn position_score(total_pnl: f64, holding_period_hours: f64, percent_closed: f64) -> u8 {
    let raw = profit_component(total_pnl)
        + holding_component(holding_period_hours)
        + closure_component(percent_closed);
    raw.round().clamp(0.0, 100.0) as u8
}

/// Winning closed round trips as a percentage; 0 when none have closed.
pub fn win_rate(winning: u32, closed: u32) -> f64 {
    if closed == 0 {
        return 0.0;
    }
    (winning as f64 / closed as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profit_component_scales_and_caps() {
        assert_eq!(profit_component(-50.0), 0.0);
        assert_eq!(profit_component(0.0), 0.0);
        assert!((profit_component(200.0) - 2.0).abs() < 1e-10);
        assert_eq!(profit_component(10_000.0), 50.0);
    }

    #[test]
    fn holding_component_bands() {
        assert_eq!(holding_component(0.0), 25.0);
        assert_eq!(holding_component(5.0 * 24.0), 25.0);
        assert_eq!(holding_component(5.0 * 24.0 + 1.0), 15.0);
        assert_eq!(holding_component(10.0 * 24.0), 15.0);
        assert_eq!(holding_component(20.0 * 24.0), 10.0);
        assert_eq!(holding_component(21.0 * 24.0), 5.0);
    }

    #[test]
    fn closure_component_bands() {
        assert_eq!(closure_component(100.0), 25.0);
        assert_eq!(closure_component(75.0), 20.0);
        assert_eq!(closure_component(50.0), 15.0);
        assert_eq!(closure_component(0.1), 10.0);
        assert_eq!(closure_component(0.0), 0.0);
    }

    #[test]
    fn score_rounds_sum() {
        // 2 + 25 + 25 = 52
        assert_eq!(position_score(200.0, 1.0, 100.0), 52);
        // 2.6 + 25 + 0 → 28
        assert_eq!(position_score(260.0, 1.0, 0.0), 28);
        // max
        assert_eq!(position_score(1e9, 0.0, 100.0), 100);
        // loss, long hold, open
        assert_eq!(position_score(-500.0, 1000.0, 0.0), 5);
    }

    #[test]
    fn nan_pnl_scores_no_profit() {
        assert_eq!(position_score(f64::NAN, 1.0, 0.0), 25);
    }

    #[test]
    fn win_rate_guards_zero() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(win_rate(1, 1), 100.0);
        assert_eq!(win_rate(1, 4), 25.0);
    }
}
