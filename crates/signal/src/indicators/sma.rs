use super::IndicatorError;

/// Simple moving average: arithmetic mean of the whole supplied slice.
pub fn sma(prices: &[f64]) -> Result<f64, IndicatorError> {
    if prices.is_empty() {
        return Err(IndicatorError::insufficient(1, 0));
    }
    Ok(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// Population standard deviation (divide by N, not N−1) around `mean`.
pub fn std_dev(prices: &[f64], mean: f64) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let variance =
        prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / prices.len() as f64;
    variance.sqrt()
}
