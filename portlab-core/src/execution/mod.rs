//! Execution simulator — target weights in, concrete orders out.
//!
//! Orders are emitted in two phases, all sells before all buys. Sells free
//! the cash that funds the buys within the same day, so the phase ordering
//! is a correctness requirement, not a style choice. Within each phase
//! orders are sorted by symbol for reproducible logs.

pub mod cost;

pub use cost::CostModel;

use crate::allocation::AllocationProfile;
use crate::domain::{Order, OrderSide, Portfolio, Symbol};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

impl From<&AllocationProfile> for CostModel {
    fn from(profile: &AllocationProfile) -> Self {
        CostModel::new(profile.fee_rate, profile.slippage_bps)
    }
}

/// Compute rebalance orders that move the portfolio toward `targets`.
///
/// Per symbol: target dollar allocation = weight x current equity; the
/// difference to the current holding value becomes a sell or buy sized in
/// dollars and converted to quantity at the reference price. A symbol with
/// no price today is skipped entirely — its position is retained and marked
/// at the last known value, and no order is placed for it.
///
/// Buys are pre-sized against projected cash (cash on hand plus estimated
/// sell proceeds), so the ledger's insufficient-funds check stays a
/// defensive invariant rather than an expected path.
pub fn compute_orders(
    targets: &BTreeMap<Symbol, f64>,
    portfolio: &Portfolio,
    prices: &BTreeMap<Symbol, f64>,
    profile: &AllocationProfile,
) -> Vec<Order> {
    let cost = CostModel::from(profile);
    let equity = portfolio.equity(prices);
    if equity <= 0.0 {
        return Vec::new();
    }
    let min_trade_value = (profile.min_trade_fraction * equity).max(1.0);

    // Union of targeted and held symbols; anything held but not targeted
    // has an implicit target weight of 0 and gets liquidated.
    let symbols: BTreeSet<&Symbol> = targets.keys().chain(portfolio.positions.keys()).collect();

    // Per-symbol dollar deltas are independent of each other (read-only
    // inputs), so they can be computed in parallel.
    let deltas: Vec<(Symbol, f64, f64)> = symbols
        .into_par_iter()
        .filter_map(|symbol| {
            let price = *prices.get(symbol)?;
            if price <= 0.0 {
                return None;
            }
            let weight = targets.get(symbol).copied().unwrap_or(0.0);
            let current_value = portfolio.quantity(symbol) * price;
            let delta = weight * equity - current_value;
            Some((symbol.clone(), price, delta))
        })
        .collect();

    // Phase 1: sells, sorted by symbol.
    let mut sells: Vec<Order> = deltas
        .iter()
        .filter(|(_, _, delta)| -delta >= min_trade_value)
        .map(|(symbol, price, delta)| {
            let quantity = (-delta / price).min(portfolio.quantity(symbol));
            Order::sell(symbol.clone(), quantity, *price)
        })
        .filter(|order| order.quantity > 0.0)
        .collect();
    sells.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    // Phase 2: buys, sized against projected cash after the sells land.
    let mut projected_cash = portfolio.cash
        + sells
            .iter()
            .map(|order| {
                let fill_price = cost.fill_price(order.reference_price, OrderSide::Sell);
                cost.sell_proceeds(fill_price, order.quantity)
            })
            .sum::<f64>();

    let mut buy_deltas: Vec<&(Symbol, f64, f64)> = deltas
        .iter()
        .filter(|(_, _, delta)| *delta >= min_trade_value)
        .collect();
    buy_deltas.sort_by(|a, b| a.0.cmp(&b.0));

    let mut buys = Vec::with_capacity(buy_deltas.len());
    for (symbol, price, delta) in buy_deltas {
        let fill_price = cost.fill_price(*price, OrderSide::Buy);
        let affordable = cost.max_affordable_quantity(projected_cash, fill_price);
        let quantity = (delta / price).min(affordable);
        if quantity * price < min_trade_value {
            continue;
        }
        projected_cash -= cost.buy_cost(fill_price, quantity);
        buys.push(Order::buy(symbol.clone(), quantity, *price));
    }

    sells.extend(buys);
    sells
}

/// Stop-loss sweep: full liquidation of any position whose price has
/// fallen `stop_loss_pct` below its average cost. Runs before the target
/// rebalance each day.
pub fn stop_loss_orders(
    portfolio: &Portfolio,
    prices: &BTreeMap<Symbol, f64>,
    profile: &AllocationProfile,
) -> Vec<Order> {
    if profile.stop_loss_pct >= 1.0 {
        return Vec::new();
    }
    portfolio
        .positions
        .values()
        .filter_map(|pos| {
            let price = *prices.get(&pos.symbol)?;
            if price <= 0.0 || pos.avg_cost <= 0.0 {
                return None;
            }
            let stop = pos.avg_cost * (1.0 - profile.stop_loss_pct);
            (price <= stop).then(|| Order::sell(pos.symbol.clone(), pos.quantity, price))
        })
        .collect()
}
