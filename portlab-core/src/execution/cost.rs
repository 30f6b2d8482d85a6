//! Cost model — slippage and fee calculation.
//!
//! Slippage is directional: buyers pay a higher price, sellers receive a
//! lower one. The fee is proportional to fill notional and charged on both
//! sides.

use crate::domain::OrderSide;
use serde::{Deserialize, Serialize};

/// Execution friction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Proportional fee on fill notional (0.0005 = 5 bps).
    pub fee_rate: f64,
    /// Slippage in basis points, applied against the trader.
    pub slippage_bps: f64,
}

impl CostModel {
    pub fn new(fee_rate: f64, slippage_bps: f64) -> Self {
        Self {
            fee_rate,
            slippage_bps,
        }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Execution price for a side, worse than the reference for the trader.
    pub fn fill_price(&self, reference_price: f64, side: OrderSide) -> f64 {
        let slip = self.slippage_bps / 10_000.0;
        match side {
            OrderSide::Buy => reference_price * (1.0 + slip),
            OrderSide::Sell => reference_price * (1.0 - slip),
        }
    }

    /// Fee for a fill: `price * quantity * fee_rate`.
    pub fn fee(&self, fill_price: f64, quantity: f64) -> f64 {
        fill_price * quantity * self.fee_rate
    }

    /// Total cash required to buy `quantity` at `fill_price`, fee included.
    pub fn buy_cost(&self, fill_price: f64, quantity: f64) -> f64 {
        fill_price * quantity * (1.0 + self.fee_rate)
    }

    /// Net cash received for selling `quantity` at `fill_price`, fee deducted.
    pub fn sell_proceeds(&self, fill_price: f64, quantity: f64) -> f64 {
        fill_price * quantity * (1.0 - self.fee_rate)
    }

    /// Largest quantity affordable with `cash` at `fill_price`, fee included.
    pub fn max_affordable_quantity(&self, cash: f64, fill_price: f64) -> f64 {
        if fill_price <= 0.0 {
            return 0.0;
        }
        (cash / (fill_price * (1.0 + self.fee_rate))).max(0.0)
    }
}
