//! Offline replay of the decision pipeline over a historical candle series.
//!
//! The runner owns a fresh, isolated [`Portfolio`]. It never touches live
//! session state, and callers are expected to run it off the live dispatch
//! path (the API layer uses `spawn_blocking`).

use tracing::{debug, info};

use common::{Candle, TradeRecord};
use ledger::{Portfolio, RandomLot};
use signal::{IndicatorKind, StrategyConfig};

/// Fixed trailing window replayed ahead of each candle under test.
pub const WINDOW: usize = 100;

/// Replay the aggregator + ledger over `series` with a 100-candle trailing
/// window, returning the ordered trade log.
///
/// Strategy defaults are the backtest set (RSI 14/70/30) with exactly the
/// requested kinds active. A series no longer than the window produces an
/// empty log; too little data is not an error.
pub fn run(
    series: &[Candle],
    starting_balance: f64,
    kinds: &[IndicatorKind],
) -> Vec<TradeRecord> {
    if series.len() <= WINDOW {
        debug!(candles = series.len(), "Series shorter than window, nothing to replay");
        return Vec::new();
    }

    let config = StrategyConfig::backtest_defaults(kinds);
    let mut portfolio = Portfolio::new(starting_balance);
    let mut policy = RandomLot::default();
    let mut trades = Vec::new();

    for i in WINDOW..series.len() {
        let candle = &series[i];
        let window = &series[i - WINDOW..i];

        let (_, decision) = signal::evaluate(candle, window, &config);
        if !decision.should_trade {
            continue;
        }
        if let Some(record) = portfolio.execute(candle, decision.action, &mut policy) {
            trades.push(record);
        }
    }

    info!(
        candles = series.len(),
        trades = trades.len(),
        final_balance = portfolio.balance(),
        "Backtest finished"
    );
    trades
}
