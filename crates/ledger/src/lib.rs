pub mod policy;

pub use policy::{FifoLot, LotSelectionPolicy, RandomLot};

use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{Candle, TradeAction, TradeRecord};

/// Fraction of the current balance committed to each buy.
pub const POSITION_FRACTION: f64 = 0.10;

/// A quantity of an instrument bought at a specific price, held until sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub symbol: String,
    pub quantity: f64,
    pub bought_at: f64,
}

/// A session's virtual portfolio: cash balance plus open lots.
///
/// Every mutation happens through [`Portfolio::execute`], which enforces the
/// ledger invariants: the balance never goes negative, every lot and trade
/// has positive quantity, and rejected trades change nothing. Rejections are
/// quiet no-ops (debug-logged), never errors; a precondition miss is a
/// normal outcome of the decision pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    balance: f64,
    lots: Vec<Lot>,
}

impl Portfolio {
    pub fn new(balance: f64) -> Self {
        Self { balance: balance.max(0.0), lots: Vec::new() }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Open lots in insertion (purchase) order.
    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    /// Execute a trade decision against the candle's close price.
    ///
    /// Position sizing is 10% of the current balance, computed fresh here.
    /// Sells liquidate the entire lot chosen by `policy`; a `None` from the
    /// policy aborts the sell. Returns `None` on every rejection path with
    /// no state change.
    pub fn execute(
        &mut self,
        candle: &Candle,
        action: TradeAction,
        policy: &mut dyn LotSelectionPolicy,
    ) -> Option<TradeRecord> {
        if candle.close <= 0.0 {
            debug!(symbol = %candle.symbol, close = candle.close, "Rejected trade on non-positive price");
            return None;
        }
        let price = candle.close;

        match action {
            TradeAction::Buy => {
                let quantity = self.balance * POSITION_FRACTION / price;
                if quantity <= 0.0 {
                    debug!(symbol = %candle.symbol, balance = self.balance, "Nothing to buy with");
                    return None;
                }
                let cost = price * quantity;
                if cost > self.balance {
                    debug!(
                        symbol = %candle.symbol,
                        cost,
                        balance = self.balance,
                        "Insufficient funds, buy rejected"
                    );
                    return None;
                }

                self.balance -= cost;
                self.lots.push(Lot {
                    symbol: candle.symbol.clone(),
                    quantity,
                    bought_at: price,
                });

                Some(TradeRecord {
                    action,
                    price,
                    quantity,
                    balance: self.balance,
                    profit_or_loss: 0.0,
                    time: candle.time,
                })
            }

            TradeAction::Sell => {
                if self.lots.is_empty() {
                    debug!(symbol = %candle.symbol, "No open lots, sell rejected");
                    return None;
                }
                let index = match policy.select(&self.lots, &candle.symbol) {
                    Some(index) if index < self.lots.len() => index,
                    _ => {
                        debug!(symbol = %candle.symbol, "No matching lot selected, sell aborted");
                        return None;
                    }
                };

                let lot = self.lots.remove(index);
                let earnings = price * lot.quantity;
                let profit_or_loss = lot.quantity * (price - lot.bought_at);
                self.balance += earnings;

                Some(TradeRecord {
                    action,
                    price,
                    quantity: lot.quantity,
                    balance: self.balance,
                    profit_or_loss,
                    time: candle.time,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candle(symbol: &str, close: f64) -> Candle {
        Candle {
            symbol: symbol.into(),
            interval: "1m".into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
            time: Utc::now(),
            is_final: true,
        }
    }

    #[test]
    fn buy_moves_cost_from_balance_into_a_lot() {
        let mut portfolio = Portfolio::new(1000.0);
        let record = portfolio
            .execute(&candle("BTCUSDT", 50.0), TradeAction::Buy, &mut FifoLot)
            .expect("buy should execute");

        // 10% of 1000 = 100 USD → 2.0 units at 50
        assert!((record.quantity - 2.0).abs() < 1e-12);
        assert!((portfolio.balance() - 900.0).abs() < 1e-12);
        assert_eq!(record.profit_or_loss, 0.0);
        assert_eq!(portfolio.lots().len(), 1);
        assert_eq!(portfolio.lots()[0].symbol, "BTCUSDT");
        assert!((portfolio.lots()[0].bought_at - 50.0).abs() < 1e-12);
    }

    #[test]
    fn sell_realizes_pnl_and_removes_the_lot() {
        let mut portfolio = Portfolio::new(1000.0);
        portfolio
            .execute(&candle("BTCUSDT", 50.0), TradeAction::Buy, &mut FifoLot)
            .unwrap();

        let record = portfolio
            .execute(&candle("BTCUSDT", 60.0), TradeAction::Sell, &mut FifoLot)
            .expect("sell should execute");

        // 2.0 units sold at 60: earnings 120, pnl 2.0 * (60 − 50) = 20
        assert!((record.profit_or_loss - 20.0).abs() < 1e-12);
        assert!((portfolio.balance() - 1020.0).abs() < 1e-12);
        assert!(portfolio.lots().is_empty());
    }

    #[test]
    fn sell_with_empty_inventory_is_a_quiet_no_op() {
        let mut portfolio = Portfolio::new(1000.0);
        let record = portfolio.execute(&candle("BTCUSDT", 60.0), TradeAction::Sell, &mut FifoLot);
        assert!(record.is_none());
        assert!((portfolio.balance() - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn random_policy_mismatch_aborts_without_mutation() {
        let mut portfolio = Portfolio::new(1000.0);
        portfolio
            .execute(&candle("ETHUSDT", 50.0), TradeAction::Buy, &mut FifoLot)
            .unwrap();
        let balance_before = portfolio.balance();

        // Only lot is ETHUSDT; whatever index the rng picks, the symbol
        // mismatches and the sell must abort rather than retry
        let mut policy = RandomLot::default();
        let record = portfolio.execute(&candle("BTCUSDT", 60.0), TradeAction::Sell, &mut policy);

        assert!(record.is_none());
        assert_eq!(portfolio.lots().len(), 1);
        assert!((portfolio.balance() - balance_before).abs() < 1e-12);
    }

    #[test]
    fn fifo_policy_skips_other_symbols() {
        let mut portfolio = Portfolio::new(1000.0);
        portfolio
            .execute(&candle("ETHUSDT", 10.0), TradeAction::Buy, &mut FifoLot)
            .unwrap();
        portfolio
            .execute(&candle("BTCUSDT", 10.0), TradeAction::Buy, &mut FifoLot)
            .unwrap();

        let record = portfolio
            .execute(&candle("BTCUSDT", 12.0), TradeAction::Sell, &mut FifoLot)
            .expect("matching lot should sell");

        assert_eq!(record.action, TradeAction::Sell);
        assert_eq!(portfolio.lots().len(), 1);
        assert_eq!(portfolio.lots()[0].symbol, "ETHUSDT");
    }

    #[test]
    fn zero_balance_buy_is_rejected() {
        let mut portfolio = Portfolio::new(0.0);
        let record = portfolio.execute(&candle("BTCUSDT", 50.0), TradeAction::Buy, &mut FifoLot);
        assert!(record.is_none());
        assert!(portfolio.lots().is_empty());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let mut portfolio = Portfolio::new(1000.0);
        assert!(portfolio
            .execute(&candle("BTCUSDT", 0.0), TradeAction::Buy, &mut FifoLot)
            .is_none());
        assert!(portfolio
            .execute(&candle("BTCUSDT", -5.0), TradeAction::Sell, &mut FifoLot)
            .is_none());
        assert!((portfolio.balance() - 1000.0).abs() < 1e-12);
    }
}
