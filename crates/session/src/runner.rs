use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use common::{Candle, FeedSubscription, MarketData};

use crate::messages::{ClientMessage, ServerMessage};
use crate::state::{Session, WindowCache};
use crate::store::SessionStore;

/// Channel ends handed to the transport (the WebSocket handler): raw client
/// text goes in, serialized-ready server messages come out.
pub struct SessionChannels {
    pub client_tx: mpsc::Sender<String>,
    pub out_rx: mpsc::Receiver<ServerMessage>,
}

/// Register a session, spawn its runner task, and return the transport ends.
///
/// The runner task is the session's single writer: every mutation of
/// balance, inventory, strategy config, and cached window happens inside it,
/// serialized by its select loop. Dropping `client_tx` tears the session
/// down (subscription closed, store entry removed).
pub async fn spawn_session(
    feed: Arc<dyn MarketData>,
    store: SessionStore,
) -> (uuid::Uuid, SessionChannels) {
    let id = store.register().await;

    let (client_tx, client_rx) = mpsc::channel::<String>(32);
    let (out_tx, out_rx) = mpsc::channel::<ServerMessage>(256);
    let (candle_tx, candle_rx) = mpsc::channel::<Candle>(256);

    let runner = SessionRunner {
        session: Session::new(id),
        feed,
        store,
        client_rx,
        out_tx,
        candle_tx,
        candle_rx,
        subscription: None,
    };
    tokio::spawn(runner.run());

    (id, SessionChannels { client_tx, out_rx })
}

struct SessionRunner {
    session: Session,
    feed: Arc<dyn MarketData>,
    store: SessionStore,
    client_rx: mpsc::Receiver<String>,
    out_tx: mpsc::Sender<ServerMessage>,
    /// Cloned into each feed subscription so candles land in our select loop.
    candle_tx: mpsc::Sender<Candle>,
    candle_rx: mpsc::Receiver<Candle>,
    subscription: Option<FeedSubscription>,
}

impl SessionRunner {
    async fn run(mut self) {
        info!(session = %self.session.id, "Session runner started");

        loop {
            tokio::select! {
                maybe_text = self.client_rx.recv() => match maybe_text {
                    Some(text) => self.handle_client_text(&text).await,
                    None => break, // client disconnected
                },
                Some(candle) = self.candle_rx.recv() => {
                    self.handle_candle(candle).await;
                }
            }
        }

        // Teardown: the subscription close is idempotent and also runs on drop
        if let Some(subscription) = self.subscription.take() {
            subscription.close();
        }
        self.store.unregister(self.session.id).await;
        info!(session = %self.session.id, "Session runner stopped");
    }

    async fn handle_client_text(&mut self, text: &str) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => self.handle_client(message).await,
            Err(_) => {
                let error = if mentions_subscription(text) {
                    "Symbol and interval are required."
                } else {
                    "Unrecognized message."
                };
                self.send(ServerMessage::error(error)).await;
            }
        }
    }

    async fn handle_client(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::SetBalance { balance } => {
                if balance < 0.0 || !balance.is_finite() {
                    self.send(ServerMessage::error("Balance must be a non-negative number."))
                        .await;
                    return;
                }
                self.session.set_balance(balance);
            }
            ClientMessage::UpdateStrategy { strategy } => {
                self.session.apply_strategy(&strategy);
            }
            ClientMessage::Subscribe { symbol, interval } => {
                if symbol.is_empty() || interval.is_empty() {
                    self.send(ServerMessage::error("Symbol and interval are required."))
                        .await;
                    return;
                }
                self.resubscribe(symbol, interval).await;
            }
        }
    }

    /// Close the previous stream before opening the new one so two feeds can
    /// never deliver into the same session state.
    async fn resubscribe(&mut self, symbol: String, interval: String) {
        if let Some(previous) = self.subscription.take() {
            info!(session = %self.session.id, "Closing previous feed subscription");
            previous.close();
        }

        let cached = matches!(
            &self.session.window,
            Some(w) if w.symbol == symbol && w.interval == interval
        );
        if !cached {
            let candles = self.feed.fetch_candles(&symbol, &interval, None, None).await;
            info!(
                session = %self.session.id,
                symbol, interval,
                candles = candles.len(),
                "Historical window fetched"
            );
            self.session.window = Some(WindowCache {
                symbol: symbol.clone(),
                interval: interval.clone(),
                candles,
            });
        }

        self.subscription =
            Some(self.feed.subscribe(&symbol, &interval, self.candle_tx.clone()));
        self.store.set_subscription(self.session.id, &symbol, &interval).await;
    }

    async fn handle_candle(&mut self, candle: Candle) {
        self.send(ServerMessage::Candle((&candle).into())).await;

        if let Some(record) = self.session.on_candle(&candle) {
            info!(
                session = %self.session.id,
                action = %record.action,
                price = record.price,
                quantity = record.quantity,
                balance = record.balance,
                "Virtual trade executed"
            );
            self.send(ServerMessage::Trade(record)).await;
        }
    }

    async fn send(&self, message: ServerMessage) {
        if self.out_tx.send(message).await.is_err() {
            warn!(session = %self.session.id, "Outbound channel closed");
        }
    }
}

/// Heuristic for the legacy error text: the client was clearly attempting a
/// subscription but left a field out.
fn mentions_subscription(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|v| v.get("symbol").is_some() || v.get("interval").is_some())
        .unwrap_or(false)
}
