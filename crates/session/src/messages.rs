use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{Candle, TradeRecord};
use signal::StrategyUpdate;

/// One inbound client message, decoded as an explicit union rather than
/// inferred from loose field presence. Variants are tried in declaration
/// order, so `{"balance": …}` wins even if other fields tag along.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    /// Set the initial virtual balance and reset the inventory.
    SetBalance { balance: f64 },
    /// Toggle/configure one indicator kind.
    UpdateStrategy { strategy: StrategyUpdate },
    /// (Re)subscribe to a live kline stream and begin evaluation.
    Subscribe { symbol: String, interval: String },
}

/// One outbound session message. Untagged: each variant already carries its
/// own wire discriminator (`type` for candles and trades, `error` otherwise).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Candle(CandleEcho),
    Trade(TradeRecord),
    Error { error: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error { error: message.into() }
    }
}

/// Candle echo: the candle's fields under `{"type":"candle", …}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandleEcho {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub symbol: String,
    pub interval: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    pub is_final: bool,
}

impl From<&Candle> for CandleEcho {
    fn from(candle: &Candle) -> Self {
        CandleEcho {
            kind: "candle",
            symbol: candle.symbol.clone(),
            interval: candle.interval.clone(),
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            time: candle.time,
            is_final: candle.is_final,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::TradeAction;

    #[test]
    fn decodes_the_three_inbound_shapes() {
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(r#"{"balance": 1000}"#).unwrap(),
            ClientMessage::SetBalance { .. }
        ));
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(
                r#"{"strategy": {"type": "rsi", "active": true, "period": 14}}"#
            )
            .unwrap(),
            ClientMessage::UpdateStrategy { .. }
        ));
        assert!(matches!(
            serde_json::from_str::<ClientMessage>(r#"{"symbol": "BTCUSDT", "interval": "1m"}"#)
                .unwrap(),
            ClientMessage::Subscribe { .. }
        ));
    }

    #[test]
    fn missing_interval_does_not_decode() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"symbol": "BTCUSDT"}"#).is_err());
    }

    #[test]
    fn candle_echo_wire_shape() {
        let candle = Candle {
            symbol: "BTCUSDT".into(),
            interval: "1m".into(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
            time: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            is_final: true,
        };
        let json = serde_json::to_value(ServerMessage::Candle((&candle).into())).unwrap();
        assert_eq!(json["type"], "candle");
        assert_eq!(json["isFinal"], true);
        assert_eq!(json["time"], 1_700_000_000_000i64);
    }

    #[test]
    fn trade_broadcast_wire_shape() {
        let record = TradeRecord {
            action: TradeAction::Sell,
            price: 105.0,
            quantity: 2.0,
            balance: 1210.0,
            profit_or_loss: 10.0,
            time: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        };
        let json = serde_json::to_value(ServerMessage::Trade(record)).unwrap();
        assert_eq!(json["type"], "sell");
        assert_eq!(json["profitOrLoss"], 10.0);
        assert_eq!(json["balance"], 1210.0);
    }

    #[test]
    fn error_wire_shape() {
        let json = serde_json::to_value(ServerMessage::error("Symbol and interval are required."))
            .unwrap();
        assert_eq!(json["error"], "Symbol and interval are required.");
    }
}
