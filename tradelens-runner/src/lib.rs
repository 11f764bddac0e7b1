//! TradeLens Runner: analysis orchestration on top of `tradelens-core`.
//!
//! This crate provides:
//! - TOML configuration with validation and fingerprinting
//! - CSV loading for trades and candles with dataset hashing
//! - Request/report types at each component boundary
//! - Parallel per-ticker position tracking and request generations
//! - Summary metrics and JSON / CSV / Markdown export

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod request;
pub mod runner;
pub mod summary;

pub use batch::{track_positions, RequestGeneration};
pub use config::{AnalysisConfig, ConfigError, IndicatorOptions, MacdOptions};
pub use data_loader::{
    load_candles, load_trades, parse_candles, parse_trades, LoadError, LoadedCandles,
    LoadedTrades,
};
pub use export::{
    export_bundle_csv, export_json, export_positions_csv, generate_report, import_report_json,
    write_output,
};
pub use request::{
    run_analytics_request, run_indicator_request, run_positions_request, AnalyticsRequest,
    IndicatorReport, IndicatorRequest, PositionsReport, PositionsRequest,
};
pub use runner::{run_report_from_file, AnalysisReport, AnalysisRunner, RunError, Stamped};
pub use summary::{DayPnl, TradeSummary};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
        assert_send::<IndicatorOptions>();
        assert_sync::<IndicatorOptions>();
    }

    #[test]
    fn runner_is_send_sync() {
        assert_send::<AnalysisRunner>();
        assert_sync::<AnalysisRunner>();
        assert_send::<RequestGeneration>();
        assert_sync::<RequestGeneration>();
    }

    #[test]
    fn reports_are_send_sync() {
        assert_send::<AnalysisReport>();
        assert_sync::<AnalysisReport>();
        assert_send::<IndicatorReport>();
        assert_sync::<IndicatorReport>();
        assert_send::<PositionsReport>();
        assert_sync::<PositionsReport>();
        assert_send::<TradeSummary>();
        assert_sync::<TradeSummary>();
    }
}
