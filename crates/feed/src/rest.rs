use chrono::{TimeZone, Utc};
use serde_json::Value;

use common::{Candle, Error, Result};

/// Exchange-imposed cap on klines per request.
const MAX_KLINES: usize = 1000;

/// Fetch historical klines, oldest first.
pub(crate) async fn fetch_klines(
    http: &reqwest::Client,
    base_url: &str,
    symbol: &str,
    interval: &str,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
) -> Result<Vec<Candle>> {
    let mut url = format!(
        "{base_url}/api/v3/klines?symbol={}&interval={interval}&limit={MAX_KLINES}",
        symbol.to_uppercase()
    );
    if let Some(start) = start_ms {
        url.push_str(&format!("&startTime={start}"));
    }
    if let Some(end) = end_ms {
        url.push_str(&format!("&endTime={end}"));
    }

    let resp = http
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
    if !status.is_success() {
        return Err(Error::Feed(format!("HTTP {status}: {body}")));
    }

    let rows: Value = serde_json::from_str(&body)?;
    let rows = rows
        .as_array()
        .ok_or_else(|| Error::Feed("kline response is not an array".to_string()))?;

    let candles = rows
        .iter()
        .filter_map(|row| parse_kline_row(symbol, interval, row))
        .collect();
    Ok(candles)
}

/// One kline row is a 12-element array:
/// `[openTime, open, high, low, close, volume, closeTime, …]`
/// with prices as strings. Malformed rows are skipped.
fn parse_kline_row(symbol: &str, interval: &str, row: &Value) -> Option<Candle> {
    let fields = row.as_array()?;
    let price = |i: usize| fields.get(i)?.as_str()?.parse::<f64>().ok();
    let close_time_ms = fields.get(6)?.as_i64()?;

    Some(Candle {
        symbol: symbol.to_uppercase(),
        interval: interval.to_string(),
        open: price(1)?,
        high: price(2)?,
        low: price(3)?,
        close: price(4)?,
        volume: price(5)?,
        time: Utc.timestamp_millis_opt(close_time_ms).single()?,
        // Historical klines are always closed
        is_final: true,
    })
}
