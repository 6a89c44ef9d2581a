use super::ema::{ema, DEFAULT_SMOOTHING};
use super::IndicatorError;

/// MACD line plus its signal line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
}

/// MACD = EMA(short) − EMA(long), both over the same full price series.
///
/// Known simplification: the signal line is seeded from the single latest
/// MACD value instead of a rolling MACD history, so it collapses to the MACD
/// value itself and `signal_period` has no effect. See DESIGN.md before
/// "fixing" this. Needs at least `long_period + 1` data points.
pub fn macd(
    prices: &[f64],
    short_period: usize,
    long_period: usize,
    signal_period: usize,
) -> Result<MacdOutput, IndicatorError> {
    let short = ema(prices, short_period, DEFAULT_SMOOTHING)?;
    let long = ema(prices, long_period, DEFAULT_SMOOTHING)?;
    let line = short - long;

    let _ = signal_period;
    Ok(MacdOutput {
        macd: line,
        signal: line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_long_period_plus_one() {
        let prices = vec![100.0; 26];
        assert_eq!(
            macd(&prices, 12, 26, 9),
            Err(IndicatorError::insufficient(27, 26))
        );
    }

    #[test]
    fn signal_equals_macd_line() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        let out = macd(&prices, 12, 26, 9).unwrap();
        assert_eq!(out.signal, out.macd);
    }

    #[test]
    fn uptrend_puts_short_ema_above_long() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let out = macd(&prices, 12, 26, 9).unwrap();
        assert!(out.macd > 0.0, "got {}", out.macd);
    }

    #[test]
    fn downtrend_puts_macd_negative() {
        let prices: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let out = macd(&prices, 12, 26, 9).unwrap();
        assert!(out.macd < 0.0, "got {}", out.macd);
    }
}
