//! REST endpoints for historical data and backtests.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use signal::IndicatorKind;
use tracing::error;

use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/klines", get(get_klines))
        .route("/api/backtest", post(post_backtest))
}

fn missing_params() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Symbol and interval are required." })),
    )
        .into_response()
}

// ── GET /api/klines ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KlinesQuery {
    symbol: Option<String>,
    interval: Option<String>,
    start_time: Option<i64>,
    end_time: Option<i64>,
}

async fn get_klines(State(state): State<AppState>, Query(query): Query<KlinesQuery>) -> Response {
    let symbol = query.symbol.filter(|s| !s.is_empty());
    let interval = query.interval.filter(|s| !s.is_empty());
    let (Some(symbol), Some(interval)) = (symbol, interval) else {
        return missing_params();
    };

    let candles = state
        .feed
        .fetch_candles(&symbol, &interval, query.start_time, query.end_time)
        .await;
    Json(candles).into_response()
}

// ── POST /api/backtest ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BacktestRequest {
    symbol: String,
    interval: String,
    balance: f64,
    start_time: Option<i64>,
    end_time: Option<i64>,
    #[serde(default)]
    strategies: Vec<IndicatorKind>,
}

async fn post_backtest(
    State(state): State<AppState>,
    Json(request): Json<BacktestRequest>,
) -> Response {
    if request.symbol.is_empty() || request.interval.is_empty() {
        return missing_params();
    }

    let series = state
        .feed
        .fetch_candles(
            &request.symbol,
            &request.interval,
            request.start_time,
            request.end_time,
        )
        .await;

    let balance = request.balance;
    let strategies = request.strategies;
    let outcome =
        tokio::task::spawn_blocking(move || backtest::run(&series, balance, &strategies)).await;

    match outcome {
        Ok(trades) => Json(trades).into_response(),
        Err(err) => {
            error!(error = %err, "backtest task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Backtest failed." })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use common::{Candle, FeedSubscription, MarketData};
    use session::SessionStore;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use crate::{router, AppState};

    struct CannedFeed {
        candles: Vec<Candle>,
    }

    #[async_trait]
    impl MarketData for CannedFeed {
        async fn fetch_candles(
            &self,
            _symbol: &str,
            _interval: &str,
            _start_ms: Option<i64>,
            _end_ms: Option<i64>,
        ) -> Vec<Candle> {
            self.candles.clone()
        }

        fn subscribe(
            &self,
            _symbol: &str,
            _interval: &str,
            _tx: mpsc::Sender<Candle>,
        ) -> FeedSubscription {
            FeedSubscription::new(tokio::spawn(async {}).abort_handle())
        }
    }

    fn candle(close: f64) -> Candle {
        Candle {
            symbol: "BTCUSDT".into(),
            interval: "1m".into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
            time: Utc::now(),
            is_final: true,
        }
    }

    fn state_with(candles: Vec<Candle>) -> AppState {
        AppState {
            feed: Arc::new(CannedFeed { candles }),
            store: SessionStore::default(),
        }
    }

    #[tokio::test]
    async fn klines_requires_symbol_and_interval() {
        let app = router(state_with(vec![]));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/klines?symbol=BTCUSDT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Symbol and interval are required.");
    }

    #[tokio::test]
    async fn klines_returns_the_fetched_series() {
        let app = router(state_with(vec![candle(100.0), candle(101.0)]));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/klines?symbol=BTCUSDT&interval=1m")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["close"], 101.0);
    }

    #[tokio::test]
    async fn backtest_on_a_short_series_yields_no_trades() {
        let app = router(state_with(vec![candle(100.0); 50]));
        let request = Request::builder()
            .method("POST")
            .uri("/api/backtest")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"symbol":"BTCUSDT","interval":"1m","balance":1000.0,"strategies":["sma"]}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn backtest_rejects_an_empty_symbol() {
        let app = router(state_with(vec![]));
        let request = Request::builder()
            .method("POST")
            .uri("/api/backtest")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"symbol":"","interval":"1m","balance":1000.0}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
