//! Chart-ready analytics output.

use serde::{Deserialize, Serialize};

/// Two parallel ordered sequences, ready to hand to a charting library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Value for a label, if present.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.iter().find(|(l, _)| *l == label).map(|(_, v)| v)
    }
}

impl<L: Into<String>> FromIterator<(L, f64)> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = (L, f64)>>(iter: I) -> Self {
        let mut series = ChartSeries::new();
        for (label, value) in iter {
            series.push(label, value);
        }
        series
    }
}

/// The eight analytics blocks produced by one aggregator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBundle {
    pub equity_curve: ChartSeries,
    pub win_loss: ChartSeries,
    pub position_size: ChartSeries,
    pub daily_performance: ChartSeries,
    pub monthly_performance: ChartSeries,
    pub risk_reward: ChartSeries,
    pub trade_duration: ChartSeries,
    pub hourly_stats: ChartSeries,
}

impl AnalyticsBundle {
    /// Blocks paired with their wire names, in declaration order.
    pub fn blocks(&self) -> [(&'static str, &ChartSeries); 8] {
        [
            ("equityCurve", &self.equity_curve),
            ("winLoss", &self.win_loss),
            ("positionSize", &self.position_size),
            ("dailyPerformance", &self.daily_performance),
            ("monthlyPerformance", &self.monthly_performance),
            ("riskReward", &self.risk_reward),
            ("tradeDuration", &self.trade_duration),
            ("hourlyStats", &self.hourly_stats),
        ]
    }
}
