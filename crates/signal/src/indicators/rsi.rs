use super::IndicatorError;

/// RSI over the last `period + 1` prices.
///
/// Gains and losses are simple averages of the first `period` successive
/// differences (no Wilder smoothing). A window with no losses returns 100
/// directly, since the RS ratio would otherwise divide by zero.
/// Needs at least `period` data points.
pub fn rsi(prices: &[f64], period: usize) -> Result<f64, IndicatorError> {
    if period == 0 || prices.len() < period {
        return Err(IndicatorError::insufficient(period.max(1), prices.len()));
    }
    let recent = &prices[prices.len().saturating_sub(period + 1)..];
    let changes: Vec<f64> = recent.windows(2).map(|w| w[1] - w[0]).collect();

    let avg_gain = changes
        .iter()
        .take(period)
        .map(|&c| if c > 0.0 { c } else { 0.0 })
        .sum::<f64>()
        / period as f64;
    let avg_loss = changes
        .iter()
        .take(period)
        .map(|&c| if c < 0.0 { -c } else { 0.0 })
        .sum::<f64>()
        / period as f64;

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}
