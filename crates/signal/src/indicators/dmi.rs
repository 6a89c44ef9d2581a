use common::Candle;

use super::{true_range, IndicatorError};

/// DMI/ADX outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmiOutput {
    pub adx: f64,
    pub di_plus: f64,
    pub di_minus: f64,
}

/// Directional movement index with a simplified (non-Wilder) ADX.
///
/// ±DM and true range are averaged with simple means over the last `period`
/// pairs instead of Wilder's recursive smoothing, and the ADX is computed
/// from the latest DI values alone rather than a smoothed DX history.
/// Degenerate windows (zero true range, or both DIs zero) yield 0.0 rather
/// than NaN. Needs at least `period + 1` candles.
pub fn dmi(candles: &[Candle], period: usize) -> Result<DmiOutput, IndicatorError> {
    if period == 0 || candles.len() < period + 1 {
        return Err(IndicatorError::insufficient(period + 1, candles.len()));
    }

    let mut plus_dm = Vec::with_capacity(candles.len() - 1);
    let mut minus_dm = Vec::with_capacity(candles.len() - 1);
    let mut true_ranges = Vec::with_capacity(candles.len() - 1);

    for pair in candles.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        let up_move = current.high - previous.high;
        let down_move = previous.low - current.low;

        // Each side is zeroed when the opposite direction dominates
        plus_dm.push(if up_move > down_move { up_move.max(0.0) } else { 0.0 });
        minus_dm.push(if down_move > up_move { down_move.max(0.0) } else { 0.0 });
        true_ranges.push(true_range(current, previous));
    }

    let mean_tail = |values: &[f64]| -> f64 {
        values[values.len() - period..].iter().sum::<f64>() / period as f64
    };
    let smoothed_plus = mean_tail(&plus_dm);
    let smoothed_minus = mean_tail(&minus_dm);
    let smoothed_tr = mean_tail(&true_ranges);

    if smoothed_tr == 0.0 {
        return Ok(DmiOutput { adx: 0.0, di_plus: 0.0, di_minus: 0.0 });
    }

    let di_plus = smoothed_plus / smoothed_tr * 100.0;
    let di_minus = smoothed_minus / smoothed_tr * 100.0;
    let di_sum = di_plus + di_minus;
    let adx = if di_sum == 0.0 {
        0.0
    } else {
        (di_plus - di_minus).abs() / di_sum * 100.0
    };

    Ok(DmiOutput { adx, di_plus, di_minus })
}
