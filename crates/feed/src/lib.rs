mod rest;
mod stream;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use common::{Candle, FeedSubscription, MarketData};

use crate::stream::KlineStream;

/// Market-data client for Binance: historical klines over REST and live
/// kline updates over WebSocket.
///
/// This is a read-only collaborator with no order placement and no signed
/// endpoints. Sessions and the backtest API share one instance.
pub struct BinanceFeed {
    rest_url: String,
    ws_url: String,
    http: reqwest::Client,
}

impl BinanceFeed {
    pub fn new(rest_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            ws_url: ws_url.into(),
            http: reqwest::Client::builder()
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl MarketData for BinanceFeed {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: Option<i64>,
        end_ms: Option<i64>,
    ) -> Vec<Candle> {
        match rest::fetch_klines(&self.http, &self.rest_url, symbol, interval, start_ms, end_ms)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                // Callers tolerate "no data"; a failed fetch degrades to that
                warn!(symbol, interval, error = %e, "Historical kline fetch failed");
                Vec::new()
            }
        }
    }

    fn subscribe(
        &self,
        symbol: &str,
        interval: &str,
        tx: mpsc::Sender<Candle>,
    ) -> FeedSubscription {
        let stream = KlineStream::new(self.ws_url.clone(), symbol, interval, tx);
        let handle = tokio::spawn(stream.run());
        FeedSubscription::new(handle.abort_handle())
    }
}
