use super::{sma, std_dev, IndicatorError};

/// Bollinger Bands around the SMA of the trailing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub lower: f64,
    pub upper: f64,
    pub sma: f64,
}

/// Bands at ±2σ over the last `period` prices.
/// Needs at least `period` data points.
pub fn bollinger_bands(prices: &[f64], period: usize) -> Result<Bands, IndicatorError> {
    if prices.len() < period {
        return Err(IndicatorError::insufficient(period, prices.len()));
    }
    let recent = &prices[prices.len() - period..];
    let mean = sma(recent)?;
    let sd = std_dev(recent, mean);

    Ok(Bands {
        lower: mean - 2.0 * sd,
        upper: mean + 2.0 * sd,
        sma: mean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_bracket_the_sma() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bands = bollinger_bands(&prices, 20).unwrap();
        assert!(bands.lower <= bands.sma);
        assert!(bands.sma <= bands.upper);
    }

    #[test]
    fn constant_series_collapses_bands() {
        let prices = vec![250.0; 20];
        let bands = bollinger_bands(&prices, 20).unwrap();
        assert_eq!(bands.lower, 250.0);
        assert_eq!(bands.upper, 250.0);
        assert_eq!(bands.sma, 250.0);
    }

    #[test]
    fn short_window_is_insufficient() {
        let prices = vec![100.0; 19];
        assert_eq!(
            bollinger_bands(&prices, 20),
            Err(IndicatorError::insufficient(20, 19))
        );
    }

    #[test]
    fn uses_only_the_trailing_window() {
        // A wild prefix must not leak into a calm trailing window
        let mut prices = vec![10_000.0, 1.0, 9_999.0];
        prices.extend(std::iter::repeat(100.0).take(20));
        let bands = bollinger_bands(&prices, 20).unwrap();
        assert_eq!(bands.sma, 100.0);
        assert_eq!(bands.lower, 100.0);
    }
}
