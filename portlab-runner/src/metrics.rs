//! Headline performance metrics over an equity curve.

use portlab_core::domain::EquitySnapshot;
use serde::{Deserialize, Serialize};

/// Trading days per year, used to annualize the Sharpe ratio.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary statistics for a completed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetrics {
    /// Total return over the window (fractional, 0.25 = 25%).
    pub total_return: f64,
    /// Maximum peak-to-trough drawdown (fractional, reported positive).
    pub max_drawdown: f64,
    /// Annualized Sharpe ratio of daily returns (risk-free rate 0).
    pub sharpe: f64,
    pub num_days: usize,
}

impl PerformanceMetrics {
    /// Compute from an equity curve. Fewer than two points yields zeros.
    pub fn from_equity_curve(curve: &[EquitySnapshot]) -> Self {
        let num_days = curve.len();
        if num_days < 2 {
            return Self {
                total_return: 0.0,
                max_drawdown: 0.0,
                sharpe: 0.0,
                num_days,
            };
        }

        let first = curve[0].equity;
        let last = curve[num_days - 1].equity;
        let total_return = if first > 0.0 { last / first - 1.0 } else { 0.0 };

        let mut peak = f64::MIN;
        let mut max_drawdown: f64 = 0.0;
        for snap in curve {
            peak = peak.max(snap.equity);
            if peak > 0.0 {
                max_drawdown = max_drawdown.max((peak - snap.equity) / peak);
            }
        }

        let returns: Vec<f64> = curve
            .windows(2)
            .filter(|pair| pair[0].equity > 0.0)
            .map(|pair| pair[1].equity / pair[0].equity - 1.0)
            .collect();
        let sharpe = if returns.len() > 1 {
            let mean = returns.iter().sum::<f64>() / returns.len() as f64;
            let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
                / (returns.len() - 1) as f64;
            let std = var.sqrt();
            if std > 0.0 {
                mean / std * TRADING_DAYS_PER_YEAR.sqrt()
            } else {
                0.0
            }
        } else {
            0.0
        };

        Self {
            total_return,
            max_drawdown,
            sharpe,
            num_days,
        }
    }
}
