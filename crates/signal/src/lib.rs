pub mod aggregator;
pub mod config;
pub mod indicators;

pub use aggregator::{evaluate, Decision, SignalTally, SignalVote};
pub use config::{IndicatorKind, StrategyConfig, StrategyUpdate};
pub use indicators::IndicatorError;
