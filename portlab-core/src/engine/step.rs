//! The shared per-day step — one function for backtest and daily modes.
//!
//! Order of operations within a day: stop-loss sweep → target weights →
//! rebalance orders (sells before buys) → mark-to-market snapshot. A day
//! with no prices or no scores degrades to a snapshot-only no-op; it never
//! fails.

use crate::allocation::{self, AllocationProfile};
use crate::domain::{EquitySnapshot, Portfolio, Symbol, TradeRecord};
use crate::execution::{self, CostModel};
use crate::ledger;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Result of one simulated day.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub snapshot: EquitySnapshot,
    pub trades: Vec<TradeRecord>,
    /// True when missing prices or scores degraded the day to a no-op.
    pub degraded: bool,
}

/// Run one full rebalancing day from universe scores.
pub fn run_step(
    portfolio: &mut Portfolio,
    date: NaiveDate,
    prices: &BTreeMap<Symbol, f64>,
    scores: &BTreeMap<Symbol, f64>,
    profile: &AllocationProfile,
) -> StepOutcome {
    if prices.is_empty() || scores.is_empty() {
        return noop_step(portfolio, date, prices);
    }
    let targets = allocation::target_weights(scores, profile);
    run_step_with_weights(portfolio, date, prices, &targets, profile)
}

/// Run one rebalancing day from explicit target weights (picks-driven
/// daily mode uses this directly).
pub fn run_step_with_weights(
    portfolio: &mut Portfolio,
    date: NaiveDate,
    prices: &BTreeMap<Symbol, f64>,
    targets: &BTreeMap<Symbol, f64>,
    profile: &AllocationProfile,
) -> StepOutcome {
    if prices.is_empty() {
        return noop_step(portfolio, date, prices);
    }
    let cost = CostModel::from(profile);
    let mut trades = Vec::new();

    sweep_stop_losses(portfolio, date, prices, profile, &cost, &mut trades);

    // Orders arrive sells-first; applying them in sequence keeps cash
    // non-negative throughout the day.
    let orders = execution::compute_orders(targets, portfolio, prices, profile);
    for order in &orders {
        if let Some(fill) = ledger::execute_order(portfolio, order, &cost) {
            trades.push(TradeRecord {
                date,
                symbol: fill.symbol.clone(),
                side: fill.side,
                quantity: fill.quantity,
                price: fill.price,
                fee: fill.fee,
                cash_after: portfolio.cash,
            });
        }
    }

    portfolio.as_of = Some(date);
    StepOutcome {
        snapshot: ledger::mark_to_market(portfolio, date, prices),
        trades,
        degraded: false,
    }
}

/// Run a non-rebalancing day: stop-loss sweep and snapshot only.
pub fn run_hold_step(
    portfolio: &mut Portfolio,
    date: NaiveDate,
    prices: &BTreeMap<Symbol, f64>,
    profile: &AllocationProfile,
) -> StepOutcome {
    if prices.is_empty() {
        return noop_step(portfolio, date, prices);
    }
    let cost = CostModel::from(profile);
    let mut trades = Vec::new();
    sweep_stop_losses(portfolio, date, prices, profile, &cost, &mut trades);
    portfolio.as_of = Some(date);
    StepOutcome {
        snapshot: ledger::mark_to_market(portfolio, date, prices),
        trades,
        degraded: false,
    }
}

fn noop_step(
    portfolio: &mut Portfolio,
    date: NaiveDate,
    prices: &BTreeMap<Symbol, f64>,
) -> StepOutcome {
    portfolio.as_of = Some(date);
    StepOutcome {
        snapshot: ledger::mark_to_market(portfolio, date, prices),
        trades: Vec::new(),
        degraded: true,
    }
}

fn sweep_stop_losses(
    portfolio: &mut Portfolio,
    date: NaiveDate,
    prices: &BTreeMap<Symbol, f64>,
    profile: &AllocationProfile,
    cost: &CostModel,
    trades: &mut Vec<TradeRecord>,
) {
    for order in execution::stop_loss_orders(portfolio, prices, profile) {
        if let Some(fill) = ledger::execute_order(portfolio, &order, cost) {
            trades.push(TradeRecord {
                date,
                symbol: fill.symbol.clone(),
                side: fill.side,
                quantity: fill.quantity,
                price: fill.price,
                fee: fill.fee,
                cash_after: portfolio.cash,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderSide, Position};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn map(pairs: &[(&str, f64)]) -> BTreeMap<Symbol, f64> {
        pairs.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    #[test]
    fn empty_scores_degrade_to_noop() {
        let mut portfolio = Portfolio::new(10_000.0);
        let profile = AllocationProfile::frictionless(5, 1.0);
        let outcome = run_step(
            &mut portfolio,
            date(2),
            &map(&[("A", 100.0)]),
            &BTreeMap::new(),
            &profile,
        );
        assert!(outcome.degraded);
        assert!(outcome.trades.is_empty());
        assert_eq!(outcome.snapshot.equity, 10_000.0);
        assert_eq!(portfolio.as_of, Some(date(2)));
    }

    #[test]
    fn empty_prices_degrade_to_noop() {
        let mut portfolio = Portfolio::new(10_000.0);
        let profile = AllocationProfile::frictionless(5, 1.0);
        let outcome = run_step(
            &mut portfolio,
            date(2),
            &BTreeMap::new(),
            &map(&[("A", 1.0)]),
            &profile,
        );
        assert!(outcome.degraded);
        assert_eq!(outcome.snapshot.equity, 10_000.0);
    }

    #[test]
    fn step_buys_top_ranked_symbol() {
        let mut portfolio = Portfolio::new(10_000.0);
        let profile = AllocationProfile::frictionless(1, 1.0);
        let outcome = run_step(
            &mut portfolio,
            date(2),
            &map(&[("AAPL", 100.0), ("MSFT", 200.0)]),
            &map(&[("AAPL", 2.0), ("MSFT", 1.0)]),
            &profile,
        );
        assert!(!outcome.degraded);
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.trades[0].symbol, "AAPL");
        assert_eq!(outcome.trades[0].side, OrderSide::Buy);
        assert!((portfolio.quantity("AAPL") - 100.0).abs() < 1e-9);
        assert!(portfolio.cash.abs() < 1e-6);
        assert!((outcome.snapshot.equity - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn dropped_symbol_is_liquidated() {
        let mut portfolio = Portfolio::new(0.0);
        portfolio
            .positions
            .insert("OLD".into(), Position::new("OLD".into(), 100.0, 100.0));
        let profile = AllocationProfile::frictionless(1, 1.0);
        let outcome = run_step(
            &mut portfolio,
            date(2),
            &map(&[("OLD", 100.0), ("NEW", 100.0)]),
            &map(&[("NEW", 1.0)]),
            &profile,
        );
        assert!(!portfolio.has_position("OLD"));
        assert!((portfolio.quantity("NEW") - 100.0).abs() < 1e-9);
        assert_eq!(outcome.trades.len(), 2);
        assert_eq!(outcome.trades[0].side, OrderSide::Sell);
        assert_eq!(outcome.trades[1].side, OrderSide::Buy);
    }

    #[test]
    fn hold_step_applies_stop_loss() {
        let mut portfolio = Portfolio::new(0.0);
        portfolio
            .positions
            .insert("DOWN".into(), Position::new("DOWN".into(), 10.0, 100.0));
        let mut profile = AllocationProfile::frictionless(1, 1.0);
        profile.stop_loss_pct = 0.05;
        let outcome = run_hold_step(&mut portfolio, date(2), &map(&[("DOWN", 80.0)]), &profile);
        assert!(!portfolio.has_position("DOWN"));
        assert_eq!(outcome.trades.len(), 1);
        assert_eq!(outcome.snapshot.equity, 800.0);
    }

    #[test]
    fn equity_identity_holds_after_step() {
        let mut portfolio = Portfolio::new(10_000.0);
        let mut profile = AllocationProfile::frictionless(2, 0.6);
        profile.fee_rate = 0.001;
        profile.slippage_bps = 5.0;
        let prices = map(&[("A", 50.0), ("B", 25.0)]);
        let outcome = run_step(
            &mut portfolio,
            date(2),
            &prices,
            &map(&[("A", 2.0), ("B", 1.0)]),
            &profile,
        );
        let holdings: f64 = portfolio
            .positions
            .values()
            .map(|p| p.quantity * prices[&p.symbol])
            .sum();
        assert!((outcome.snapshot.equity - (portfolio.cash + holdings)).abs() < 1e-6);
        assert!(portfolio.cash >= 0.0);
    }
}
