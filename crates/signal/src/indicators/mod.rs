//! Stateless indicator functions over ordered price/candle history.
//!
//! Every function takes the full supplied window (oldest first) and fails
//! with [`IndicatorError::InsufficientHistory`] when too few data points are
//! given. Callers treat that as "not yet evaluable", never as a fatal error.

pub mod bollinger;
pub mod dmi;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod super_trend;

pub use bollinger::{bollinger_bands, Bands};
pub use dmi::{dmi, DmiOutput};
pub use ema::{ema, DEFAULT_SMOOTHING};
pub use macd::{macd, MacdOutput};
pub use rsi::rsi;
pub use sma::{sma, std_dev};
pub use super_trend::super_trend;

use common::Candle;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("insufficient history: need {required} data points, got {got}")]
    InsufficientHistory { required: usize, got: usize },
}

impl IndicatorError {
    pub(crate) fn insufficient(required: usize, got: usize) -> Self {
        IndicatorError::InsufficientHistory { required, got }
    }
}

/// True range of `current` given the preceding candle.
pub(crate) fn true_range(current: &Candle, previous: &Candle) -> f64 {
    let high_low = current.high - current.low;
    let high_close = (current.high - previous.close).abs();
    let low_close = (current.low - previous.close).abs();
    high_low.max(high_close).max(low_close)
}
