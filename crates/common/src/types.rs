use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV price bar for a symbol + interval + time bucket.
///
/// Arrives from the exchange kline stream (possibly still forming) or from a
/// historical fetch (always closed). Immutable once constructed. `close > 0`
/// is required before any trade can execute against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub symbol: String,
    /// Exchange-style interval, e.g. "1m", "1h".
    pub interval: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Wire format is epoch milliseconds, matching the exchange.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    /// True once the candle has closed. Only final candles enter the
    /// historical window; evaluation runs on every update.
    pub is_final: bool,
}

/// Side of a virtual trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

/// Record of one executed virtual trade.
///
/// Serializes directly to the session trade broadcast:
/// `{"type":"buy","price":…,"quantity":…,"balance":…,"profitOrLoss":…,"time":…}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[serde(rename = "type")]
    pub action: TradeAction,
    /// Execution price (the candle's close).
    pub price: f64,
    pub quantity: f64,
    /// Balance after the trade settled.
    pub balance: f64,
    /// 0 for buys; realized P&L for sells.
    pub profit_or_loss: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
}
