//! Portfolio ledger — the only code that mutates cash and positions.
//!
//! `apply_fill` is strict: it rejects fills the portfolio cannot cover.
//! `execute_order` is the engine-facing path: it builds the fill from the
//! cost model, clips quantity when cash or holdings fall short (logging a
//! warning — the simulator pre-sizes orders, so clipping here means an
//! invariant check fired), and guarantees cash never goes negative.

use crate::domain::{EquitySnapshot, Fill, Order, OrderSide, Portfolio, Position, Symbol};
use crate::execution::CostModel;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Quantities below this are treated as zero (float dust from division).
const QUANTITY_EPSILON: f64 = 1e-9;

/// Errors from strict fill application. Both variants are recovered by
/// clipping in `execute_order`; neither aborts a run.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient funds: need {needed:.2}, have {available:.2}")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("insufficient shares of {symbol}: requested {requested}, held {held}")]
    InsufficientShares {
        symbol: Symbol,
        requested: f64,
        held: f64,
    },
}

/// Apply a fill to the portfolio, strictly.
///
/// Buys fail if cash cannot cover notional plus fee; sells fail if the
/// held quantity is short of the fill quantity. On success cash, position
/// quantity, and (for buys) weighted-average cost are updated. A sell that
/// empties a position removes it.
pub fn apply_fill(portfolio: &mut Portfolio, fill: &Fill) -> Result<(), LedgerError> {
    match fill.side {
        OrderSide::Buy => {
            let needed = fill.notional() + fill.fee;
            if needed > portfolio.cash + QUANTITY_EPSILON {
                return Err(LedgerError::InsufficientFunds {
                    needed,
                    available: portfolio.cash,
                });
            }
            portfolio.cash = (portfolio.cash - needed).max(0.0);
            portfolio
                .positions
                .entry(fill.symbol.clone())
                .or_insert_with(|| Position::new(fill.symbol.clone(), 0.0, 0.0))
                .add_shares(fill.quantity, fill.price);
        }
        OrderSide::Sell => {
            let held = portfolio.quantity(&fill.symbol);
            if fill.quantity > held + QUANTITY_EPSILON {
                return Err(LedgerError::InsufficientShares {
                    symbol: fill.symbol.clone(),
                    requested: fill.quantity,
                    held,
                });
            }
            portfolio.cash += fill.notional() - fill.fee;
            let remaining = held - fill.quantity;
            if remaining <= QUANTITY_EPSILON {
                portfolio.positions.remove(&fill.symbol);
            } else if let Some(pos) = portfolio.positions.get_mut(&fill.symbol) {
                pos.quantity = remaining;
            }
        }
    }
    Ok(())
}

/// Execute an order against the portfolio, clipping where necessary.
///
/// Returns the applied fill, or `None` for degenerate orders (non-positive
/// price, dust quantity, or nothing affordable/held). Clipped fills carry
/// `clipped: true` and emit a warning.
pub fn execute_order(
    portfolio: &mut Portfolio,
    order: &Order,
    cost: &CostModel,
) -> Option<Fill> {
    if order.reference_price <= 0.0 || order.quantity <= QUANTITY_EPSILON {
        return None;
    }
    let price = cost.fill_price(order.reference_price, order.side);

    let (quantity, clipped) = match order.side {
        OrderSide::Buy => {
            let affordable = cost.max_affordable_quantity(portfolio.cash, price);
            if affordable < order.quantity {
                warn!(
                    symbol = %order.symbol,
                    requested = order.quantity,
                    affordable,
                    "buy clipped to available cash"
                );
                (affordable, true)
            } else {
                (order.quantity, false)
            }
        }
        OrderSide::Sell => {
            let held = portfolio.quantity(&order.symbol);
            if held < order.quantity - QUANTITY_EPSILON {
                warn!(
                    symbol = %order.symbol,
                    requested = order.quantity,
                    held,
                    "sell clipped to held quantity"
                );
                (held, true)
            } else {
                (order.quantity, false)
            }
        }
    };

    if quantity <= QUANTITY_EPSILON {
        return None;
    }

    let fill = Fill {
        symbol: order.symbol.clone(),
        side: order.side,
        quantity,
        price,
        fee: cost.fee(price, quantity),
        clipped,
    };
    // Cannot fail: quantity was clipped to what the portfolio covers.
    apply_fill(portfolio, &fill).ok()?;
    Some(fill)
}

/// Mark the portfolio to market: a pure read producing one equity-curve
/// point. Positions without a price today are valued at average cost.
pub fn mark_to_market(
    portfolio: &Portfolio,
    date: NaiveDate,
    prices: &BTreeMap<Symbol, f64>,
) -> EquitySnapshot {
    let holdings_value = portfolio.holdings_value(prices);
    EquitySnapshot {
        date,
        cash: portfolio.cash,
        holdings_value,
        equity: portfolio.cash + holdings_value,
    }
}
