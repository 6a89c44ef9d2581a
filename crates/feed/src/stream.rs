use std::time::Duration;

use chrono::{TimeZone, Utc};
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use url::Url;

use common::{Candle, Result};

/// Binance kline WebSocket stream for one (symbol, interval).
///
/// Parses kline events into `Candle`s and delivers them on an mpsc channel
/// to the owning session. Reconnects with exponential backoff; stops for
/// good once the receiving session is gone.
pub(crate) struct KlineStream {
    ws_url: String,
    symbol: String,
    interval: String,
    tx: mpsc::Sender<Candle>,
}

impl KlineStream {
    pub(crate) fn new(
        ws_url: String,
        symbol: impl Into<String>,
        interval: impl Into<String>,
        tx: mpsc::Sender<Candle>,
    ) -> Self {
        Self {
            ws_url,
            symbol: symbol.into(),
            interval: interval.into(),
            tx,
        }
    }

    /// Run the stream loop until the session drops its receiver.
    /// Call this inside a `tokio::spawn`; aborting the task closes the stream.
    pub(crate) async fn run(self) {
        let mut backoff = Duration::from_secs(1);
        const MAX_BACKOFF: Duration = Duration::from_secs(60);

        loop {
            info!(symbol = %self.symbol, interval = %self.interval, "Connecting to kline stream");
            match self.connect_once().await {
                Ok(ConnectionEnd::ReceiverGone) => {
                    info!(symbol = %self.symbol, "Session gone, closing kline stream");
                    return;
                }
                Ok(ConnectionEnd::StreamClosed) => {
                    // Clean close (e.g. 24h session end), reconnect shortly
                    info!(symbol = %self.symbol, "Kline stream closed cleanly");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    backoff = Duration::from_secs(1);
                }
                Err(e) => {
                    warn!(symbol = %self.symbol, error = %e, backoff = ?backoff, "Kline stream error, reconnecting");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }

    async fn connect_once(&self) -> Result<ConnectionEnd> {
        let url_str = format!(
            "{}/{}@kline_{}",
            self.ws_url,
            self.symbol.to_lowercase(),
            self.interval
        );
        let url = Url::parse(&url_str).map_err(|e| common::Error::WebSocket(e.to_string()))?;

        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| common::Error::WebSocket(e.to_string()))?;

        let (_, mut read) = ws_stream.split();

        while let Some(msg) = read.next().await {
            let msg = msg.map_err(|e| common::Error::WebSocket(e.to_string()))?;

            if let tokio_tungstenite::tungstenite::Message::Text(text) = msg {
                match parse_kline_event(&self.symbol, &self.interval, &text) {
                    Ok(Some(candle)) => {
                        if self.tx.send(candle).await.is_err() {
                            return Ok(ConnectionEnd::ReceiverGone);
                        }
                    }
                    Ok(None) => {} // non-kline message, skip
                    Err(e) => {
                        warn!(error = %e, "Failed to parse kline event");
                    }
                }
            }
        }

        Ok(ConnectionEnd::StreamClosed)
    }
}

enum ConnectionEnd {
    StreamClosed,
    ReceiverGone,
}

// ─── Binance kline JSON parsing ──────────────────────────────────────────────

#[derive(Deserialize)]
struct KlineWrapper {
    k: KlineData,
}

#[derive(Deserialize)]
struct KlineData {
    #[serde(rename = "o")]
    open: String,
    #[serde(rename = "h")]
    high: String,
    #[serde(rename = "l")]
    low: String,
    #[serde(rename = "c")]
    close: String,
    #[serde(rename = "v")]
    volume: String,
    #[serde(rename = "x")]
    is_closed: bool,
    #[serde(rename = "T")]
    close_time_ms: i64,
}

fn parse_kline_event(symbol: &str, interval: &str, text: &str) -> Result<Option<Candle>> {
    // Kline messages carry an "e" field set to "kline"
    let wrapper: serde_json::Value = serde_json::from_str(text)?;
    if wrapper.get("e").and_then(|v| v.as_str()) != Some("kline") {
        return Ok(None);
    }

    let kline: KlineWrapper = serde_json::from_value(wrapper)?;
    let k = kline.k;

    let time = Utc
        .timestamp_millis_opt(k.close_time_ms)
        .single()
        .unwrap_or_else(Utc::now);

    Ok(Some(Candle {
        symbol: symbol.to_uppercase(),
        interval: interval.to_string(),
        open: k.open.parse().unwrap_or(0.0),
        high: k.high.parse().unwrap_or(0.0),
        low: k.low.parse().unwrap_or(0.0),
        close: k.close.parse().unwrap_or(0.0),
        volume: k.volume.parse().unwrap_or(0.0),
        time,
        is_final: k.is_closed,
    }))
}
