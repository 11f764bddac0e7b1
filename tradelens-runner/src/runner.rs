//! Analysis runner: wires config, loaded data and the core components.
//!
//! Entry points:
//! - `AnalysisRunner::{analytics, positions, indicators}`: one component per call.
//! - `AnalysisRunner::report()`: bundle + summary + positions for one trade file.
//! - `run_report_from_file()`: loads config and trades from disk, then reports. Backs `tradelens report`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use tradelens_core::analytics::{AnalyticsBundle, TradeAnalyticsAggregator};
use tradelens_core::position::PositionLifecycleTracker;

use crate::batch::{track_positions, RequestGeneration};
use crate::config::{AnalysisConfig, ConfigError};
use crate::data_loader::{load_trades, LoadError, LoadedTrades};
use crate::request::{
    run_indicator_request, AnalyticsRequest, IndicatorReport, IndicatorRequest, PositionsReport,
    PositionsRequest,
};
use crate::summary::TradeSummary;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Request generation that produced this report.
    pub generation: u64,
    pub dataset_hash: String,
    pub config_hash: String,
    pub bundle: AnalyticsBundle,
    pub summary: TradeSummary,
    pub positions: PositionsReport,
    pub data_quality_warnings: Vec<String>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// A result tagged with the generation of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub generation: u64,
    pub value: T,
}

/// Holds a validated config and hands out fresh components per call.
#[derive(Debug)]
pub struct AnalysisRunner {
    config: AnalysisConfig,
    generations: RequestGeneration,
}

impl AnalysisRunner {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            generations: RequestGeneration::new(),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// True when no request was issued after `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generations.is_current(generation)
    }

    pub fn analytics(&self, request: &AnalyticsRequest) -> Stamped<AnalyticsBundle> {
        let generation = self.generations.advance();
        let aggregator = TradeAnalyticsAggregator::new(self.config.analytics.clone());
        Stamped {
            generation,
            value: aggregator.aggregate(&request.trades),
        }
    }

    /// Parallel per-ticker tracking.
    pub fn positions(&self, request: &PositionsRequest) -> Stamped<PositionsReport> {
        let generation = self.generations.advance();
        let tracker = PositionLifecycleTracker::new(self.config.positions.clone());
        Stamped {
            generation,
            value: track_positions(&request.trades, &tracker, &request.quotes).into(),
        }
    }

    pub fn indicators(&self, request: &IndicatorRequest) -> Stamped<IndicatorReport> {
        let generation = self.generations.advance();
        Stamped {
            generation,
            value: run_indicator_request(request, &self.config.patterns),
        }
    }

    /// Bundle, summary and positions for one loaded trade set.
    pub fn report(&self, loaded: &LoadedTrades) -> Result<AnalysisReport, RunError> {
        let generation = self.generations.advance();
        let config_hash = self.config.fingerprint()?;

        let aggregator = TradeAnalyticsAggregator::new(self.config.analytics.clone());
        let sorted = aggregator.sorted(&loaded.trades);
        let pnls = aggregator.pnls(&sorted);
        let bundle = aggregator.aggregate(&loaded.trades);
        let summary = TradeSummary::compute(&bundle, &pnls);

        let tracker = PositionLifecycleTracker::new(self.config.positions.clone());
        let positions: PositionsReport =
            track_positions(&loaded.trades, &tracker, &Default::default()).into();

        info!(
            trades = summary.trade_count,
            groups = positions.groups.len(),
            orphans = positions.orphans.len(),
            total_pnl = summary.total_pnl,
            "report complete"
        );

        Ok(AnalysisReport {
            schema_version: SCHEMA_VERSION,
            generation,
            dataset_hash: loaded.dataset_hash.clone(),
            config_hash,
            bundle,
            summary,
            positions,
            data_quality_warnings: loaded.warnings.clone(),
        })
    }
}

/// Load the config (or defaults) and the trade file, then build a report.
pub fn run_report_from_file(
    trades_path: &Path,
    config_path: Option<&Path>,
) -> Result<AnalysisReport, RunError> {
    let config = match config_path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let loaded = load_trades(trades_path)?;
    AnalysisRunner::new(config)?.report(&loaded)
}
