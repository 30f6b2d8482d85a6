//! Ranking provider seam.
//!
//! The engine is agnostic to how scores are computed: a backtest can
//! consume a pre-computed batch per date, and daily/autopilot callers can
//! plug in a live ranker. Higher score = more preferred.

use super::data::MarketData;
use crate::domain::Symbol;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Supplies per-symbol scores for a given date.
///
/// Implementations must be pure with respect to their inputs so that
/// replaying a window reproduces the same ranking.
pub trait ScoreProvider {
    /// Scores for `date`, given history up to and including that date.
    /// An empty map degrades the day to a no-op step.
    fn scores(&self, date: NaiveDate, data: &MarketData) -> BTreeMap<Symbol, f64>;
}

/// Pre-computed score batches keyed by date.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedScores {
    by_date: BTreeMap<NaiveDate, BTreeMap<Symbol, f64>>,
}

impl PrecomputedScores {
    pub fn new(by_date: BTreeMap<NaiveDate, BTreeMap<Symbol, f64>>) -> Self {
        Self { by_date }
    }

    pub fn insert(&mut self, date: NaiveDate, scores: BTreeMap<Symbol, f64>) {
        self.by_date.insert(date, scores);
    }
}

impl ScoreProvider for PrecomputedScores {
    fn scores(&self, date: NaiveDate, _data: &MarketData) -> BTreeMap<Symbol, f64> {
        self.by_date.get(&date).cloned().unwrap_or_default()
    }
}

/// A fixed score map served for every date. Test helper.
#[derive(Debug, Clone, Default)]
pub struct ConstantScores(pub BTreeMap<Symbol, f64>);

impl ScoreProvider for ConstantScores {
    fn scores(&self, _date: NaiveDate, _data: &MarketData) -> BTreeMap<Symbol, f64> {
        self.0.clone()
    }
}
