//! Portfolio — aggregate state of cash + all open positions.

use super::position::Position;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate portfolio state.
///
/// Tracks cash and open positions. The equity accounting identity must hold
/// after every simulated day: `equity == cash + sum(position market values)`.
/// Positions are keyed in a `BTreeMap` so that iteration order — and
/// therefore every downstream log — is deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub positions: BTreeMap<String, Position>,
    /// Date of the last applied step, if any.
    pub as_of: Option<NaiveDate>,
}

impl Portfolio {
    pub fn new(starting_cash: f64) -> Self {
        Self {
            cash: starting_cash,
            positions: BTreeMap::new(),
            as_of: None,
        }
    }

    /// Total equity = cash + sum of all position market values.
    ///
    /// A position whose symbol has no price today is marked at its average
    /// cost — the last value the ledger knows for it.
    pub fn equity(&self, prices: &BTreeMap<String, f64>) -> f64 {
        let holdings: f64 = self
            .positions
            .values()
            .map(|pos| {
                let price = prices.get(&pos.symbol).copied().unwrap_or(pos.avg_cost);
                pos.market_value(price)
            })
            .sum();
        self.cash + holdings
    }

    /// Market value of held positions only (equity minus cash).
    pub fn holdings_value(&self, prices: &BTreeMap<String, f64>) -> f64 {
        self.equity(prices) - self.cash
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn get_position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Quantity held for a symbol, zero if none.
    pub fn quantity(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).map_or(0.0, |p| p.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_with_no_positions() {
        let portfolio = Portfolio::new(10_000.0);
        let prices = BTreeMap::new();
        assert_eq!(portfolio.equity(&prices), 10_000.0);
    }

    #[test]
    fn equity_with_position() {
        let mut portfolio = Portfolio::new(9_000.0);
        portfolio
            .positions
            .insert("SPY".into(), Position::new("SPY".into(), 10.0, 100.0));
        let mut prices = BTreeMap::new();
        prices.insert("SPY".into(), 110.0);
        // 9_000 + 10 * 110 = 10_100
        assert_eq!(portfolio.equity(&prices), 10_100.0);
    }

    #[test]
    fn missing_price_marks_at_avg_cost() {
        let mut portfolio = Portfolio::new(0.0);
        portfolio
            .positions
            .insert("SPY".into(), Position::new("SPY".into(), 10.0, 100.0));
        let prices = BTreeMap::new();
        assert_eq!(portfolio.equity(&prices), 1_000.0);
    }

    #[test]
    fn quantity_defaults_to_zero() {
        let portfolio = Portfolio::new(10_000.0);
        assert_eq!(portfolio.quantity("SPY"), 0.0);
    }
}
