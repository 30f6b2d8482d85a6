use super::order::OrderSide;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One executed fill, as recorded in the append-only trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub price: f64,
    pub fee: f64,
    /// Cash balance immediately after this fill was applied.
    pub cash_after: f64,
}
