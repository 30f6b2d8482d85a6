use serde::{Deserialize, Serialize};

/// An open long position with weighted-average cost basis.
///
/// Quantity is fractional and strictly positive — a position sold down to
/// zero is removed from the portfolio, never kept at zero quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
}

impl Position {
    pub fn new(symbol: String, quantity: f64, avg_cost: f64) -> Self {
        Self {
            symbol,
            quantity,
            avg_cost,
        }
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.avg_cost)
    }

    /// Fold a buy into the weighted-average cost basis. Sells never call
    /// this — basis is unaffected by reductions.
    pub fn add_shares(&mut self, quantity: f64, price: f64) {
        let new_quantity = self.quantity + quantity;
        if new_quantity > 0.0 {
            self.avg_cost = (self.avg_cost * self.quantity + price * quantity) / new_quantity;
        }
        self.quantity = new_quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avg_cost_blends_on_buy() {
        let mut pos = Position::new("AAPL".into(), 10.0, 100.0);
        pos.add_shares(10.0, 120.0);
        assert_eq!(pos.quantity, 20.0);
        assert!((pos.avg_cost - 110.0).abs() < 1e-12);
    }

    #[test]
    fn market_value_and_pnl() {
        let pos = Position::new("AAPL".into(), 10.0, 100.0);
        assert_eq!(pos.market_value(110.0), 1100.0);
        assert_eq!(pos.unrealized_pnl(110.0), 100.0);
    }
}
