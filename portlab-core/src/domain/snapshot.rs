use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point on the equity curve — the mark-to-market state of the
/// portfolio at the end of a simulated day. Appended, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub date: NaiveDate,
    pub cash: f64,
    pub holdings_value: f64,
    pub equity: f64,
}
