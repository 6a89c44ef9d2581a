use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Lot;

/// Seed for the default random policy. A fixed seed keeps the default
/// policy reproducible across runs and in tests.
pub const DEFAULT_LOT_SEED: u64 = 42;

/// Chooses which open lot a sell liquidates.
///
/// Returning `None` aborts the sell entirely; the ledger does not retry
/// with a different lot.
pub trait LotSelectionPolicy: Send + Sync {
    fn select(&mut self, lots: &[Lot], symbol: &str) -> Option<usize>;
}

/// Uniformly random index over **all** open lots, regardless of symbol.
///
/// If the chosen lot's symbol does not match the candle's, the sell is
/// aborted rather than retried against a matching lot. This mirrors the
/// historical behavior exactly; see DESIGN.md for why it is kept.
#[derive(Debug)]
pub struct RandomLot {
    rng: StdRng,
}

impl RandomLot {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomLot {
    fn default() -> Self {
        Self::seeded(DEFAULT_LOT_SEED)
    }
}

impl LotSelectionPolicy for RandomLot {
    fn select(&mut self, lots: &[Lot], symbol: &str) -> Option<usize> {
        if lots.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..lots.len());
        (lots[index].symbol == symbol).then_some(index)
    }
}

/// Oldest matching lot first. Deterministic, and never aborts while a
/// matching lot exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoLot;

impl LotSelectionPolicy for FifoLot {
    fn select(&mut self, lots: &[Lot], symbol: &str) -> Option<usize> {
        lots.iter().position(|lot| lot.symbol == symbol)
    }
}
