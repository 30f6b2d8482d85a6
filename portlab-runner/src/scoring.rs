//! Built-in ranking provider for autopilot mode.
//!
//! The engine treats scoring as an external concern; this trailing-return
//! momentum ranker is the one provider the runner ships so autopilot can
//! regenerate rankings without an external picks pipeline.

use chrono::NaiveDate;
use portlab_core::domain::Symbol;
use portlab_core::engine::{MarketData, ScoreProvider};
use std::collections::BTreeMap;

/// Scores each symbol by its return over a trailing window of bars.
///
/// Deterministic and pure: the same history always produces the same
/// ranking. Symbols with fewer than two bars of history get no score.
#[derive(Debug, Clone)]
pub struct MomentumScorer {
    /// Trailing window length in bars.
    pub window: usize,
}

impl MomentumScorer {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(2),
        }
    }
}

impl Default for MomentumScorer {
    fn default() -> Self {
        Self::new(20)
    }
}

impl ScoreProvider for MomentumScorer {
    fn scores(&self, date: NaiveDate, data: &MarketData) -> BTreeMap<Symbol, f64> {
        data.bars
            .keys()
            .filter_map(|symbol| {
                let closes = data.closes_through(symbol, date);
                if closes.len() < 2 {
                    return None;
                }
                let start = closes.len().saturating_sub(self.window);
                let window = &closes[start..];
                let first = *window.first()?;
                let last = *window.last()?;
                if first <= 0.0 {
                    return None;
                }
                Some((symbol.clone(), last / first - 1.0))
            })
            .collect()
    }
}
