use common::Candle;

use super::{true_range, IndicatorError};

/// SuperTrend line from ATR bands around the last candle's midprice.
///
/// ATR is the simple mean of the last `period` true ranges. The trend flips
/// to the lower band when the second-to-last close is above the upper band
/// and to the upper band when it is below the lower band; otherwise the
/// upper band is returned. Only one candle of lookback feeds the flip
/// decision. Needs at least `period + 1` candles.
pub fn super_trend(
    candles: &[Candle],
    period: usize,
    multiplier: f64,
) -> Result<f64, IndicatorError> {
    if period == 0 || candles.len() < period + 1 {
        return Err(IndicatorError::insufficient(period + 1, candles.len()));
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|pair| true_range(&pair[1], &pair[0]))
        .collect();
    let atr =
        true_ranges[true_ranges.len() - period..].iter().sum::<f64>() / period as f64;

    let last = &candles[candles.len() - 1];
    let mid_price = (last.high + last.low) / 2.0;
    let upper_band = mid_price + multiplier * atr;
    let lower_band = mid_price - multiplier * atr;

    // A close below the lower band and a close inside the bands both land
    // on the upper band, so only the upside breakout matters.
    let prev_close = candles[candles.len() - 2].close;
    if prev_close > upper_band {
        Ok(lower_band)
    } else {
        Ok(upper_band)
    }
}
