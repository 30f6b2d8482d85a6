//! Orders — ephemeral rebalance instructions.

use serde::{Deserialize, Serialize};

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// A market order against today's close, produced by the execution
/// simulator and consumed immediately by the ledger. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    /// Today's close for the symbol, before slippage adjustment.
    pub reference_price: f64,
}

impl Order {
    pub fn buy(symbol: impl Into<String>, quantity: f64, reference_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side: OrderSide::Buy,
            quantity,
            reference_price,
        }
    }

    pub fn sell(symbol: impl Into<String>, quantity: f64, reference_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side: OrderSide::Sell,
            quantity,
            reference_price,
        }
    }

    pub fn notional(&self) -> f64 {
        self.quantity * self.reference_price
    }
}
