use serde::{Deserialize, Serialize};

/// The seven indicator kinds a session can vote with.
/// Serde names are the wire identifiers clients send in strategy updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "bollingerBands")]
    BollingerBands,
    #[serde(rename = "rsi")]
    Rsi,
    #[serde(rename = "sma")]
    Sma,
    #[serde(rename = "ema")]
    Ema,
    #[serde(rename = "macd")]
    Macd,
    #[serde(rename = "superTrend")]
    SuperTrend,
    #[serde(rename = "dmi")]
    Dmi,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 7] = [
        IndicatorKind::BollingerBands,
        IndicatorKind::Rsi,
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Macd,
        IndicatorKind::SuperTrend,
        IndicatorKind::Dmi,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerConfig {
    pub period: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiConfig {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaConfig {
    pub period: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaConfig {
    pub period: usize,
    pub smoothing: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdConfig {
    pub short_period: usize,
    pub long_period: usize,
    pub signal_period: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperTrendConfig {
    pub period: usize,
    pub multiplier: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmiConfig {
    pub period: usize,
    pub adx_threshold: f64,
    pub active: bool,
}

/// Per-session indicator configuration, one entry per kind.
///
/// All seven kinds exist from the moment the session is created; `active`
/// starts false everywhere and clients toggle kinds on via strategy updates.
/// Live defaults use period 20 across the board; the backtest constructor
/// deliberately differs only in the RSI period (14); both call sites'
/// historical defaults are kept rather than unified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyConfig {
    pub bollinger: BollingerConfig,
    pub rsi: RsiConfig,
    pub sma: SmaConfig,
    pub ema: EmaConfig,
    pub macd: MacdConfig,
    pub super_trend: SuperTrendConfig,
    pub dmi: DmiConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            bollinger: BollingerConfig { period: 20, active: false },
            rsi: RsiConfig { period: 20, overbought: 70.0, oversold: 30.0, active: false },
            sma: SmaConfig { period: 20, active: false },
            ema: EmaConfig { period: 20, smoothing: 2.0, active: false },
            macd: MacdConfig {
                short_period: 12,
                long_period: 26,
                signal_period: 9,
                active: false,
            },
            super_trend: SuperTrendConfig { period: 14, multiplier: 3.0, active: false },
            dmi: DmiConfig { period: 14, adx_threshold: 25.0, active: false },
        }
    }
}

impl StrategyConfig {
    /// Backtest defaults: RSI 14/70/30, everything else as in live defaults,
    /// with exactly the requested kinds switched on.
    pub fn backtest_defaults(kinds: &[IndicatorKind]) -> Self {
        let mut config = Self::default();
        config.rsi.period = 14;
        for &kind in kinds {
            config.set_active(kind, true);
        }
        config
    }

    pub fn is_active(&self, kind: IndicatorKind) -> bool {
        match kind {
            IndicatorKind::BollingerBands => self.bollinger.active,
            IndicatorKind::Rsi => self.rsi.active,
            IndicatorKind::Sma => self.sma.active,
            IndicatorKind::Ema => self.ema.active,
            IndicatorKind::Macd => self.macd.active,
            IndicatorKind::SuperTrend => self.super_trend.active,
            IndicatorKind::Dmi => self.dmi.active,
        }
    }

    pub fn set_active(&mut self, kind: IndicatorKind, active: bool) {
        match kind {
            IndicatorKind::BollingerBands => self.bollinger.active = active,
            IndicatorKind::Rsi => self.rsi.active = active,
            IndicatorKind::Sma => self.sma.active = active,
            IndicatorKind::Ema => self.ema.active = active,
            IndicatorKind::Macd => self.macd.active = active,
            IndicatorKind::SuperTrend => self.super_trend.active = active,
            IndicatorKind::Dmi => self.dmi.active = active,
        }
    }

    /// Apply one wire update to the matching kind's entry.
    /// Absent parameters keep their current values.
    pub fn apply(&mut self, update: &StrategyUpdate) {
        match update.kind {
            IndicatorKind::BollingerBands => {
                let entry = &mut self.bollinger;
                entry.active = update.active;
                if let Some(period) = update.period {
                    entry.period = period;
                }
            }
            IndicatorKind::Rsi => {
                let entry = &mut self.rsi;
                entry.active = update.active;
                if let Some(period) = update.period {
                    entry.period = period;
                }
                if let Some(overbought) = update.overbought {
                    entry.overbought = overbought;
                }
                if let Some(oversold) = update.oversold {
                    entry.oversold = oversold;
                }
            }
            IndicatorKind::Sma => {
                let entry = &mut self.sma;
                entry.active = update.active;
                if let Some(period) = update.period {
                    entry.period = period;
                }
            }
            IndicatorKind::Ema => {
                let entry = &mut self.ema;
                entry.active = update.active;
                if let Some(period) = update.period {
                    entry.period = period;
                }
                if let Some(smoothing) = update.smoothing {
                    entry.smoothing = smoothing;
                }
            }
            IndicatorKind::Macd => {
                let entry = &mut self.macd;
                entry.active = update.active;
                if let Some(short_period) = update.short_period {
                    entry.short_period = short_period;
                }
                if let Some(long_period) = update.long_period {
                    entry.long_period = long_period;
                }
                if let Some(signal_period) = update.signal_period {
                    entry.signal_period = signal_period;
                }
            }
            IndicatorKind::SuperTrend => {
                let entry = &mut self.super_trend;
                entry.active = update.active;
                if let Some(period) = update.period {
                    entry.period = period;
                }
                if let Some(multiplier) = update.multiplier {
                    entry.multiplier = multiplier;
                }
            }
            IndicatorKind::Dmi => {
                let entry = &mut self.dmi;
                entry.active = update.active;
                if let Some(period) = update.period {
                    entry.period = period;
                }
                if let Some(adx_threshold) = update.adx_threshold {
                    entry.adx_threshold = adx_threshold;
                }
            }
        }
    }
}

/// One strategy update from the wire, e.g.
/// `{"type":"rsi","active":true,"period":14,"oversold":25}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StrategyUpdate {
    #[serde(rename = "type")]
    pub kind: IndicatorKind,
    pub active: bool,
    pub period: Option<usize>,
    pub overbought: Option<f64>,
    pub oversold: Option<f64>,
    pub smoothing: Option<f64>,
    pub short_period: Option<usize>,
    pub long_period: Option<usize>,
    pub signal_period: Option<usize>,
    pub multiplier: Option<f64>,
    pub adx_threshold: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kinds_start_inactive() {
        let config = StrategyConfig::default();
        for kind in IndicatorKind::ALL {
            assert!(!config.is_active(kind), "{kind:?} should start inactive");
        }
    }

    #[test]
    fn backtest_defaults_use_rsi_14_and_activate_requested_kinds() {
        let config =
            StrategyConfig::backtest_defaults(&[IndicatorKind::Rsi, IndicatorKind::Sma]);
        assert_eq!(config.rsi.period, 14);
        assert!(config.is_active(IndicatorKind::Rsi));
        assert!(config.is_active(IndicatorKind::Sma));
        assert!(!config.is_active(IndicatorKind::Macd));
        // Live defaults keep RSI at 20; the two call sites differ on purpose
        assert_eq!(StrategyConfig::default().rsi.period, 20);
    }

    #[test]
    fn update_patches_only_supplied_params() {
        let mut config = StrategyConfig::default();
        let update: StrategyUpdate =
            serde_json::from_str(r#"{"type":"rsi","active":true,"period":7}"#).unwrap();
        config.apply(&update);
        assert!(config.rsi.active);
        assert_eq!(config.rsi.period, 7);
        assert_eq!(config.rsi.overbought, 70.0);
        assert_eq!(config.rsi.oversold, 30.0);
    }

    #[test]
    fn kind_wire_names_round_trip() {
        for (kind, name) in [
            (IndicatorKind::BollingerBands, "\"bollingerBands\""),
            (IndicatorKind::SuperTrend, "\"superTrend\""),
            (IndicatorKind::Dmi, "\"dmi\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), name);
        }
    }
}
