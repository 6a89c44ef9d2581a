use super::IndicatorError;

/// Default EMA smoothing factor; multiplier = smoothing / (period + 1).
pub const DEFAULT_SMOOTHING: f64 = 2.0;

/// Exponential moving average over the whole slice.
///
/// Seeds with the SMA of the first `period` prices, then folds the remainder
/// forward with `ema += (price − ema) * multiplier`.
/// Needs at least `period + 1` data points.
pub fn ema(prices: &[f64], period: usize, smoothing: f64) -> Result<f64, IndicatorError> {
    if period == 0 || prices.len() < period + 1 {
        return Err(IndicatorError::insufficient(period + 1, prices.len()));
    }

    let mut value = prices[..period].iter().sum::<f64>() / period as f64;
    let multiplier = smoothing / (period as f64 + 1.0);

    for &price in &prices[period..] {
        value = (price - value) * multiplier + value;
    }

    Ok(value)
}
