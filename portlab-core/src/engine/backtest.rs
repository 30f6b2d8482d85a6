//! Backtest driver — strict date-order loop over a historical window.
//!
//! Days are inherently sequential (each day's holdings feed the next), so
//! there is no parallelism across days. Rebalancing happens every
//! `rebalance_every` days; the stop-loss sweep and the equity snapshot run
//! on every day.

use super::data::MarketData;
use super::scores::ScoreProvider;
use super::step::{run_hold_step, run_step};
use crate::allocation::{AllocationProfile, ConfigError};
use crate::domain::{EquitySnapshot, Portfolio, TradeRecord};
use tracing::debug;

/// Parameters for a backtest run.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub starting_cash: f64,
    pub profile: AllocationProfile,
    /// Rebalance every N-th trading day (1 = daily). The first day always
    /// rebalances.
    pub rebalance_every: usize,
}

impl BacktestConfig {
    pub fn new(starting_cash: f64, profile: AllocationProfile) -> Self {
        Self {
            starting_cash,
            profile,
            rebalance_every: 5,
        }
    }
}

/// Everything a completed backtest produces.
#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub equity_curve: Vec<EquitySnapshot>,
    pub trades: Vec<TradeRecord>,
    /// Days degraded to a no-op because prices or scores were missing.
    pub degraded_days: usize,
    pub final_portfolio: Portfolio,
}

impl BacktestReport {
    pub fn final_equity(&self) -> f64 {
        self.equity_curve
            .last()
            .map_or(self.final_portfolio.cash, |snap| snap.equity)
    }
}

/// Run a backtest over the full window covered by `data`.
///
/// Config errors abort before the first simulated day; after that the run
/// always completes, degrading individual days as needed.
pub fn run_backtest(
    config: &BacktestConfig,
    data: &MarketData,
    scorer: &dyn ScoreProvider,
) -> Result<BacktestReport, ConfigError> {
    config.profile.validate()?;
    let rebalance_every = config.rebalance_every.max(1);

    let mut portfolio = Portfolio::new(config.starting_cash);
    let mut equity_curve = Vec::with_capacity(data.dates.len());
    let mut trades = Vec::new();
    let mut degraded_days = 0;

    for (day, &date) in data.dates.iter().enumerate() {
        let prices = data.closes_on(date);
        let outcome = if day % rebalance_every == 0 {
            let scores = scorer.scores(date, data);
            run_step(&mut portfolio, date, &prices, &scores, &config.profile)
        } else {
            run_hold_step(&mut portfolio, date, &prices, &config.profile)
        };
        if outcome.degraded {
            degraded_days += 1;
            debug!(%date, "degraded day: no prices or scores");
        }
        equity_curve.push(outcome.snapshot);
        trades.extend(outcome.trades);
    }

    Ok(BacktestReport {
        equity_curve,
        trades,
        degraded_days,
        final_portfolio: portfolio,
    })
}
