//! Reporting and export: JSON, CSV, and Markdown output.
//!
//! - **JSON**: full report serialization with schema versioning
//! - **CSV**: analytics bundle in long form (`block,label,value`) and a
//!   per-group positions table
//! - **Markdown**: human-readable single-report summary
//!
//! Persisted reports include a `schema_version` field. Newer versions are
//! rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use tradelens_core::analytics::AnalyticsBundle;
use tradelens_core::domain::PositionGroup;

use crate::runner::{AnalysisReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize any report value to pretty JSON.
pub fn export_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize to JSON")
}

/// Deserialize an `AnalysisReport`, rejecting unknown schema versions.
pub fn import_report_json(json: &str) -> Result<AnalysisReport> {
    let report: AnalysisReport =
        serde_json::from_str(json).context("failed to deserialize AnalysisReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export every block of a bundle as rows of `block,label,value`.
pub fn export_bundle_csv(bundle: &AnalyticsBundle) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["block", "label", "value"])?;
    for (block, series) in bundle.blocks() {
        for (label, value) in series.iter() {
            wtr.write_record([block, label, format!("{value:.6}").as_str()])?;
        }
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export position groups, one row per `(ticker, cycle)`.
pub fn export_positions_csv(groups: &[PositionGroup]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "cycle",
        "status",
        "net_shares",
        "percent_closed",
        "realized_pnl",
        "unrealized_pnl",
        "total_fees",
        "total_dividends",
        "avg_entry_price",
        "avg_exit_price",
        "holding_period_hours",
        "win_rate",
        "score",
        "trades",
    ])?;

    for g in groups {
        let row: Vec<String> = vec![
            g.ticker().to_string(),
            g.key.cycle.to_string(),
            g.status.as_str().to_string(),
            format!("{:.6}", g.net_shares),
            format!("{:.2}", g.percent_closed),
            format!("{:.2}", g.realized_pnl),
            format!("{:.2}", g.unrealized_pnl),
            format!("{:.2}", g.total_fees),
            format!("{:.2}", g.total_dividends),
            format!("{:.6}", g.summary.avg_entry_price),
            format!("{:.6}", g.summary.avg_exit_price),
            format!("{:.2}", g.summary.holding_period_hours),
            format!("{:.2}", g.summary.win_rate),
            g.summary.score.to_string(),
            g.trade_ids.len().to_string(),
        ];
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Output ─────────────────────────────────────────────────────────

/// Write rendered output to `path`, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

// ─── Markdown reports ───────────────────────────────────────────────

/// Generate a Markdown summary of one report.
pub fn generate_report(report: &AnalysisReport) -> String {
    let mut md = String::with_capacity(2048);
    let s = &report.summary;

    md.push_str("# Trade Report\n\n");

    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Trades | {} |\n", s.trade_count));
    md.push_str(&format!("| Total P&L | {:.2} |\n", s.total_pnl));
    md.push_str(&format!("| Win Rate | {:.1}% |\n", s.win_rate));
    md.push_str(&format!("| Profit Factor | {:.2} |\n", s.profit_factor));
    md.push_str(&format!("| Max Drawdown | {:.2} |\n", s.max_drawdown));
    if let Some(best) = &s.best_day {
        md.push_str(&format!("| Best Day | {} ({:.2}) |\n", best.day, best.pnl));
    }
    if let Some(worst) = &s.worst_day {
        md.push_str(&format!("| Worst Day | {} ({:.2}) |\n", worst.day, worst.pnl));
    }
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    md.push('\n');

    md.push_str("## Positions\n\n");
    if report.positions.groups.is_empty() {
        md.push_str("_No positions._\n\n");
    } else {
        md.push_str("| Group | Status | Closed | Realized | Unrealized | Score |\n");
        md.push_str("| --- | --- | --- | --- | --- | --- |\n");
        for g in &report.positions.groups {
            md.push_str(&format!(
                "| {} | {} | {:.0}% | {:.2} | {:.2} | {} |\n",
                g.key,
                g.status.as_str(),
                g.percent_closed,
                g.realized_pnl,
                g.unrealized_pnl,
                g.summary.score
            ));
        }
        md.push('\n');
    }
    if !report.positions.orphans.is_empty() {
        md.push_str(&format!(
            "{} trade(s) had no open position: {}\n\n",
            report.positions.orphans.len(),
            report
                .positions
                .orphans
                .iter()
                .map(|id| id.0.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    if !report.data_quality_warnings.is_empty() {
        md.push_str("## Data Quality\n\n");
        for w in &report.data_quality_warnings {
            md.push_str(&format!("- {w}\n"));
        }
        md.push('\n');
    }

    md
}
