use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// What a session is currently subscribed to, if anything.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    pub symbol: Option<String>,
    pub interval: Option<String>,
}

/// Registry of live sessions, keyed by session token.
///
/// Session *state* lives inside each runner task; the store only tracks
/// which sessions exist and what they subscribe to, for health reporting
/// and teardown accounting. Identity is an explicit per-connection token;
/// two browser tabs are two sessions, never silently merged.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionInfo>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new session token and register it.
    pub async fn register(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(id, SessionInfo::default());
        info!(session = %id, "Session registered");
        id
    }

    pub async fn set_subscription(&self, id: Uuid, symbol: &str, interval: &str) {
        if let Some(info) = self.inner.write().await.get_mut(&id) {
            info.symbol = Some(symbol.to_string());
            info.interval = Some(interval.to_string());
        }
    }

    pub async fn unregister(&self, id: Uuid) {
        self.inner.write().await.remove(&id);
        info!(session = %id, "Session unregistered");
    }

    pub async fn active_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_and_unregister_track_the_count() {
        let store = SessionStore::new();
        assert_eq!(store.active_count().await, 0);

        let a = store.register().await;
        let b = store.register().await;
        assert_ne!(a, b, "session tokens must be distinct");
        assert_eq!(store.active_count().await, 2);

        store.unregister(a).await;
        assert_eq!(store.active_count().await, 1);
        // Unregistering twice is harmless
        store.unregister(a).await;
        assert_eq!(store.active_count().await, 1);
    }

    #[tokio::test]
    async fn subscription_info_is_recorded() {
        let store = SessionStore::new();
        let id = store.register().await;
        store.set_subscription(id, "BTCUSDT", "1m").await;
        let info = store.inner.read().await.get(&id).cloned().unwrap();
        assert_eq!(info.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(info.interval.as_deref(), Some("1m"));
    }
}
