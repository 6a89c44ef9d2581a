use tracing::debug;
use uuid::Uuid;

use common::{Candle, TradeRecord};
use ledger::{LotSelectionPolicy, Portfolio, RandomLot};
use signal::{StrategyConfig, StrategyUpdate};

/// Cap on the cached historical window per session. Matches the maximum a
/// single historical fetch can return.
pub const MAX_WINDOW: usize = 1000;

/// Cached historical window, keyed by what it was fetched for so a
/// re-subscribe to the same (symbol, interval) skips the wholesale re-fetch.
#[derive(Debug, Clone)]
pub struct WindowCache {
    pub symbol: String,
    pub interval: String,
    pub candles: Vec<Candle>,
}

/// All state owned by one live session.
///
/// Mutated only by that session's runner task (single-writer); nothing here
/// is shared or locked. The strategy config exists with all seven kinds
/// inactive from the start; the portfolio exists only once the client has
/// supplied an initial balance.
pub struct Session {
    pub id: Uuid,
    pub portfolio: Option<Portfolio>,
    pub strategy: StrategyConfig,
    pub window: Option<WindowCache>,
    policy: Box<dyn LotSelectionPolicy>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            portfolio: None,
            strategy: StrategyConfig::default(),
            window: None,
            policy: Box::new(RandomLot::default()),
        }
    }

    /// Swap in a different lot-selection policy (e.g. FIFO).
    pub fn with_policy(mut self, policy: Box<dyn LotSelectionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Set the initial balance; any prior inventory is discarded.
    pub fn set_balance(&mut self, balance: f64) {
        debug!(session = %self.id, balance, "Balance set, inventory reset");
        self.portfolio = Some(Portfolio::new(balance));
    }

    pub fn apply_strategy(&mut self, update: &StrategyUpdate) {
        debug!(session = %self.id, kind = ?update.kind, active = update.active, "Strategy updated");
        self.strategy.apply(update);
    }

    /// Evaluate one candle tick against the cached window and execute the
    /// decision if one fires and a portfolio exists.
    ///
    /// Every tick is evaluated; only final candles extend the window, and
    /// only when they belong to the cached (symbol, interval).
    pub fn on_candle(&mut self, candle: &Candle) -> Option<TradeRecord> {
        let window = self
            .window
            .as_ref()
            .filter(|w| w.symbol == candle.symbol && w.interval == candle.interval)
            .map(|w| w.candles.as_slice())
            .unwrap_or(&[]);

        let (_, decision) = signal::evaluate(candle, window, &self.strategy);

        let mut record = None;
        if decision.should_trade {
            if let Some(portfolio) = self.portfolio.as_mut() {
                record = portfolio.execute(candle, decision.action, self.policy.as_mut());
            }
        }

        if candle.is_final {
            if let Some(cache) = self
                .window
                .as_mut()
                .filter(|w| w.symbol == candle.symbol && w.interval == candle.interval)
            {
                cache.candles.push(candle.clone());
                if cache.candles.len() > MAX_WINDOW {
                    cache.candles.remove(0);
                }
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::TradeAction;
    use signal::IndicatorKind;

    fn candle(close: f64, is_final: bool) -> Candle {
        Candle {
            symbol: "BTCUSDT".into(),
            interval: "1m".into(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1.0,
            time: Utc::now(),
            is_final,
        }
    }

    fn session_with_window(closes: &[f64]) -> Session {
        let mut session = Session::new(Uuid::new_v4());
        session.window = Some(WindowCache {
            symbol: "BTCUSDT".into(),
            interval: "1m".into(),
            candles: closes.iter().map(|&c| candle(c, true)).collect(),
        });
        session
    }

    #[test]
    fn no_portfolio_means_no_trades_even_on_a_signal() {
        let mut session = session_with_window(&vec![100.0; 40]);
        session.strategy.set_active(IndicatorKind::Sma, true);
        assert!(session.on_candle(&candle(80.0, false)).is_none());
    }

    #[test]
    fn signal_with_portfolio_executes_a_buy() {
        let mut session = session_with_window(&vec![100.0; 40]);
        session.strategy.set_active(IndicatorKind::Sma, true);
        session.set_balance(1000.0);

        let record = session.on_candle(&candle(80.0, false)).expect("buy should fire");
        assert_eq!(record.action, TradeAction::Buy);
        assert!(record.balance < 1000.0);
    }

    #[test]
    fn only_final_candles_extend_the_window() {
        let mut session = session_with_window(&vec![100.0; 10]);
        session.on_candle(&candle(101.0, false));
        assert_eq!(session.window.as_ref().unwrap().candles.len(), 10);
        session.on_candle(&candle(101.0, true));
        assert_eq!(session.window.as_ref().unwrap().candles.len(), 11);
    }

    #[test]
    fn foreign_symbol_candles_do_not_pollute_the_cache() {
        let mut session = session_with_window(&vec![100.0; 10]);
        let mut other = candle(50.0, true);
        other.symbol = "ETHUSDT".into();
        session.on_candle(&other);
        assert_eq!(session.window.as_ref().unwrap().candles.len(), 10);
    }

    #[test]
    fn set_balance_resets_inventory() {
        let mut session = session_with_window(&vec![100.0; 40]);
        session.strategy.set_active(IndicatorKind::Sma, true);
        session.set_balance(1000.0);
        session.on_candle(&candle(80.0, false)).unwrap();
        assert_eq!(session.portfolio.as_ref().unwrap().lots().len(), 1);

        session.set_balance(500.0);
        let portfolio = session.portfolio.as_ref().unwrap();
        assert!(portfolio.lots().is_empty());
        assert_eq!(portfolio.balance(), 500.0);
    }
}
