use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::Candle;

/// Handle to a live kline subscription.
///
/// Closing aborts the underlying stream task; `close` is idempotent and the
/// subscription is also closed on drop, so a session can never leak a stream
/// or receive candles from two feeds at once.
#[derive(Debug)]
pub struct FeedSubscription {
    handle: AbortHandle,
}

impl FeedSubscription {
    pub fn new(handle: AbortHandle) -> Self {
        Self { handle }
    }

    pub fn close(&self) {
        self.handle.abort();
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Abstraction over the exchange market-data collaborator.
///
/// `BinanceFeed` in `crates/feed` implements this for production; tests use
/// in-memory fakes. This is the only boundary the core crosses to reach the
/// exchange. No order placement, no signing.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch historical candles, oldest first, capped at 1000 per call.
    ///
    /// Returns an empty list on any failure; callers are expected to
    /// tolerate "no data" rather than handle a feed error.
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: Option<i64>,
        end_ms: Option<i64>,
    ) -> Vec<Candle>;

    /// Open a live kline stream for (symbol, interval), delivering every
    /// update (final or forming) on `tx`. The stream runs until the returned
    /// subscription is closed or dropped.
    fn subscribe(
        &self,
        symbol: &str,
        interval: &str,
        tx: mpsc::Sender<Candle>,
    ) -> FeedSubscription;
}
