use super::order::OrderSide;
use serde::{Deserialize, Serialize};

/// The executed result of an order.
///
/// `quantity` may be smaller than the requested order quantity when cash or
/// holdings could not cover the full size; `clipped` records that the
/// reduction happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    /// Execution price after slippage adjustment.
    pub price: f64,
    /// Proportional fee charged on the fill notional.
    pub fee: f64,
    pub clipped: bool,
}

impl Fill {
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}
