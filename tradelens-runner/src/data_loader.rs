//! CSV loading for trades and candles.
//!
//! Rows that deserialize but fail basic sanity checks (negative quantity,
//! non-finite price, inverted OHLC) are skipped with a warning rather than
//! failing the whole file. Rows that do not deserialize at all are an error.
//!
//! Every load carries a dataset hash: BLAKE3 over the canonical JSON of the
//! accepted records, so identical inputs fingerprint identically regardless
//! of CSV whitespace or column order.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use tradelens_core::domain::{Candle, Trade, TradeAction, TradeId};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to hash dataset: {0}")]
    Hash(#[from] serde_json::Error),
}

/// Trades accepted from a CSV file.
#[derive(Debug, Clone)]
pub struct LoadedTrades {
    pub trades: Vec<Trade>,
    /// BLAKE3 hex digest of the accepted trades.
    pub dataset_hash: String,
    /// Human-readable notes on skipped rows.
    pub warnings: Vec<String>,
}

/// Candles accepted from a CSV file, in timestamp order.
#[derive(Debug, Clone)]
pub struct LoadedCandles {
    pub candles: Vec<Candle>,
    pub dataset_hash: String,
    pub warnings: Vec<String>,
}

/// BLAKE3 hex digest of the JSON form of `records`.
pub fn dataset_hash<T: Serialize>(records: &[T]) -> Result<String, LoadError> {
    let json = serde_json::to_vec(records)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}

/// One CSV trade row. Blank cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct TradeRow {
    id: String,
    ticker: String,
    action: TradeAction,
    quantity: f64,
    price: f64,
    #[serde(default)]
    currency: Option<String>,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    fees: Option<f64>,
    #[serde(default)]
    result: Option<f64>,
    #[serde(default)]
    stop_loss: Option<f64>,
    #[serde(default)]
    take_profit: Option<f64>,
    #[serde(default)]
    open_time: Option<DateTime<Utc>>,
    #[serde(default)]
    close_time: Option<DateTime<Utc>>,
}

impl From<TradeRow> for Trade {
    fn from(row: TradeRow) -> Self {
        Trade {
            id: TradeId::new(row.id),
            ticker: row.ticker,
            action: row.action,
            quantity: row.quantity,
            price: row.price,
            currency: row
                .currency
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "USD".to_string()),
            timestamp: row.timestamp,
            fees: row.fees.unwrap_or(0.0),
            result: row.result,
            stop_loss: row.stop_loss,
            take_profit: row.take_profit,
            open_time: row.open_time,
            close_time: row.close_time,
        }
    }
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Load trades from a CSV file with a header row.
///
/// Required columns: `id, ticker, action, quantity, price, timestamp`
/// (RFC 3339). Optional: `currency, fees, result, stop_loss, take_profit,
/// open_time, close_time`.
pub fn load_trades(path: &Path) -> Result<LoadedTrades, LoadError> {
    let loaded = parse_trades(open(path)?)?;
    debug!(path = %path.display(), trades = loaded.trades.len(), "loaded trades");
    Ok(loaded)
}

/// Parse trades from any CSV source.
pub fn parse_trades<R: Read>(input: R) -> Result<LoadedTrades, LoadError> {
    let mut trades = Vec::new();
    let mut warnings = Vec::new();

    for (row, record) in reader(input).deserialize::<TradeRow>().enumerate() {
        let trade = Trade::from(record?);
        if let Some(reason) = trade_defect(&trade) {
            let note = format!("row {}: skipped trade '{}': {reason}", row + 1, trade.id);
            warn!("{note}");
            warnings.push(note);
            continue;
        }
        trades.push(trade);
    }

    let dataset_hash = dataset_hash(&trades)?;
    Ok(LoadedTrades {
        trades,
        dataset_hash,
        warnings,
    })
}

fn trade_defect(trade: &Trade) -> Option<&'static str> {
    if trade.ticker.is_empty() {
        Some("empty ticker")
    } else if !trade.quantity.is_finite() || trade.quantity < 0.0 {
        Some("quantity must be a non-negative number")
    } else if !trade.price.is_finite() || trade.price < 0.0 {
        Some("price must be a non-negative number")
    } else if !trade.fees.is_finite() || trade.fees < 0.0 {
        Some("fees must be a non-negative number")
    } else {
        None
    }
}

/// Load candles from a CSV file with columns
/// `timestamp, open, high, low, close[, volume]` (epoch milliseconds).
pub fn load_candles(path: &Path) -> Result<LoadedCandles, LoadError> {
    let loaded = parse_candles(open(path)?)?;
    debug!(path = %path.display(), candles = loaded.candles.len(), "loaded candles");
    Ok(loaded)
}

/// Parse candles from any CSV source. Output is sorted by timestamp.
pub fn parse_candles<R: Read>(input: R) -> Result<LoadedCandles, LoadError> {
    let mut candles = Vec::new();
    let mut warnings = Vec::new();

    for (row, record) in reader(input).deserialize::<Candle>().enumerate() {
        let candle = record?;
        if candle.is_void() || !candle.is_sane() {
            let note = format!(
                "row {}: skipped candle at {}: invalid OHLC",
                row + 1,
                candle.timestamp
            );
            warn!("{note}");
            warnings.push(note);
            continue;
        }
        candles.push(candle);
    }
    candles.sort_by_key(|c| c.timestamp);

    let dataset_hash = dataset_hash(&candles)?;
    Ok(LoadedCandles {
        candles,
        dataset_hash,
        warnings,
    })
}
