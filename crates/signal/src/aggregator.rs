use common::{Candle, TradeAction};

use crate::config::{IndicatorKind, StrategyConfig};
use crate::indicators::{self, IndicatorError};

/// Percentage of evaluated indicators that must agree before a trade fires.
pub const TRADE_THRESHOLD_PCT: f64 = 60.0;

/// One indicator's opinion for the current candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalVote {
    Buy,
    Sell,
    None,
}

/// Vote counts across all indicators that were active and evaluable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalTally {
    pub buy_count: usize,
    pub sell_count: usize,
    /// Indicators that cast a vote, including `None` votes. Active indicators
    /// without enough history are excluded entirely.
    pub total_evaluated: usize,
}

impl SignalTally {
    fn record(&mut self, vote: SignalVote) {
        self.total_evaluated += 1;
        match vote {
            SignalVote::Buy => self.buy_count += 1,
            SignalVote::Sell => self.sell_count += 1,
            SignalVote::None => {}
        }
    }

    /// Convert the tally into a trade decision.
    /// A trade fires when either side clears [`TRADE_THRESHOLD_PCT`].
    /// Equal buy/sell percentages resolve to Sell (kept literally; DESIGN.md).
    pub fn decision(&self) -> Decision {
        if self.total_evaluated == 0 {
            return Decision { should_trade: false, action: TradeAction::Sell };
        }
        let total = self.total_evaluated as f64;
        let buy_pct = self.buy_count as f64 / total * 100.0;
        let sell_pct = self.sell_count as f64 / total * 100.0;

        Decision {
            should_trade: buy_pct > TRADE_THRESHOLD_PCT || sell_pct > TRADE_THRESHOLD_PCT,
            action: if buy_pct > sell_pct { TradeAction::Buy } else { TradeAction::Sell },
        }
    }
}

/// The aggregated outcome for one candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub should_trade: bool,
    /// Only meaningful when `should_trade` is true.
    pub action: TradeAction,
}

/// Evaluate every active indicator against the historical window and tally
/// the votes for the candle under test.
///
/// Indicators are computed over the window only; the candle's close is then
/// compared against them. An indicator that cannot be computed yet is
/// silently excluded from the tally.
pub fn evaluate(
    candle: &Candle,
    window: &[Candle],
    config: &StrategyConfig,
) -> (SignalTally, Decision) {
    let closes: Vec<f64> = window.iter().map(|c| c.close).collect();

    let mut tally = SignalTally::default();
    for kind in IndicatorKind::ALL {
        if !config.is_active(kind) {
            continue;
        }
        match vote(kind, candle, window, &closes, config) {
            Ok(v) => tally.record(v),
            Err(IndicatorError::InsufficientHistory { .. }) => {}
        }
    }

    let decision = tally.decision();
    (tally, decision)
}

/// Cast one kind's vote: crossing below the indicator's low reference votes
/// Buy, the symmetric high crossing votes Sell, anything else is None.
fn vote(
    kind: IndicatorKind,
    candle: &Candle,
    window: &[Candle],
    closes: &[f64],
    config: &StrategyConfig,
) -> Result<SignalVote, IndicatorError> {
    let price = candle.close;

    let vote = match kind {
        IndicatorKind::BollingerBands => {
            let bands = indicators::bollinger_bands(closes, config.bollinger.period)?;
            if price < bands.lower {
                SignalVote::Buy
            } else if price > bands.upper {
                SignalVote::Sell
            } else {
                SignalVote::None
            }
        }
        IndicatorKind::Rsi => {
            let value = indicators::rsi(closes, config.rsi.period)?;
            if value < config.rsi.oversold {
                SignalVote::Buy
            } else if value > config.rsi.overbought {
                SignalVote::Sell
            } else {
                SignalVote::None
            }
        }
        IndicatorKind::Sma => {
            let period = config.sma.period;
            if closes.len() < period {
                return Err(IndicatorError::InsufficientHistory {
                    required: period,
                    got: closes.len(),
                });
            }
            let mean = indicators::sma(&closes[closes.len() - period..])?;
            compare_to_line(price, mean)
        }
        IndicatorKind::Ema => {
            let value = indicators::ema(closes, config.ema.period, config.ema.smoothing)?;
            compare_to_line(price, value)
        }
        IndicatorKind::Macd => {
            let out = indicators::macd(
                closes,
                config.macd.short_period,
                config.macd.long_period,
                config.macd.signal_period,
            )?;
            // With the degenerate signal line this can only ever be None,
            // but the attempt still counts toward the tally
            compare_to_line(out.macd, out.signal)
        }
        IndicatorKind::SuperTrend => {
            let line =
                indicators::super_trend(window, config.super_trend.period, config.super_trend.multiplier)?;
            compare_to_line(price, line)
        }
        IndicatorKind::Dmi => {
            let out = indicators::dmi(window, config.dmi.period)?;
            if out.adx > config.dmi.adx_threshold && out.di_plus > out.di_minus {
                SignalVote::Buy
            } else if out.adx > config.dmi.adx_threshold && out.di_minus > out.di_plus {
                SignalVote::Sell
            } else {
                SignalVote::None
            }
        }
    };

    Ok(vote)
}

fn compare_to_line(value: f64, line: f64) -> SignalVote {
    if value < line {
        SignalVote::Buy
    } else if value > line {
        SignalVote::Sell
    } else {
        SignalVote::None
    }
}
