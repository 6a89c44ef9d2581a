/// All configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the HTTP + WebSocket surface.
    pub port: u16,
    /// Binance REST base URL.
    pub binance_rest_url: String,
    /// Binance WebSocket base URL (kline streams are appended to this).
    pub binance_ws_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Loads `.env` if present. Every variable has a sensible default, so an
    /// empty environment still boots against the public Binance endpoints.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            port: optional_env("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5050),
            binance_rest_url: optional_env("BINANCE_REST_URL")
                .unwrap_or_else(|| "https://api.binance.com".to_string()),
            binance_ws_url: optional_env("BINANCE_WS_URL")
                .unwrap_or_else(|| "wss://stream.binance.com:9443/ws".to_string()),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
