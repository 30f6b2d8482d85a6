//! Daily / autopilot runner — one persisted step per invocation.
//!
//! This is explicitly not a loop: each call loads (or creates) the
//! portfolio, executes a single day against the most recent available
//! prices, persists the updated state atomically, and appends to the
//! equity and trade logs. Multi-day operation is achieved by invoking it
//! once per calendar day externally.

use crate::artifacts::{append_equity_jsonl, append_trades_jsonl};
use crate::config::RunConfig;
use crate::picks::{pick_weights, read_picks};
use crate::scoring::MomentumScorer;
use crate::state::{load_state, save_state, PortfolioState};
use anyhow::{bail, Context, Result};
use portlab_core::allocation;
use portlab_core::domain::{EquitySnapshot, Portfolio, TradeRecord};
use portlab_core::engine::{run_step, run_step_with_weights, MarketData, ScoreProvider};
use std::path::PathBuf;
use tracing::info;

/// Where the daily runner keeps its persisted artifacts.
#[derive(Debug, Clone)]
pub struct DailyPaths {
    pub state: PathBuf,
    pub equity_log: PathBuf,
    pub trade_log: PathBuf,
}

impl DailyPaths {
    /// Conventional layout under an artifacts directory.
    pub fn under(dir: &std::path::Path) -> Self {
        Self {
            state: dir.join("state").join("portfolio.json"),
            equity_log: dir.join("equity.jsonl"),
            trade_log: dir.join("trades.jsonl"),
        }
    }
}

/// Where the day's target weights come from.
#[derive(Debug, Clone)]
pub enum DailyMode {
    /// Rebalance to an externally supplied picks CSV.
    Picks(PathBuf),
    /// Regenerate rankings in-process and rebalance to them.
    Autopilot,
}

/// Result of one persisted daily step.
#[derive(Debug, Clone)]
pub struct DailyOutcome {
    pub snapshot: EquitySnapshot,
    pub trades: Vec<TradeRecord>,
    pub degraded: bool,
}

/// Execute exactly one daily step and persist it.
///
/// Failure order matters: every fallible read (state, picks, prices)
/// happens before the in-memory step, and the step completes before
/// anything is written, so a failed invocation leaves the previous state
/// file and logs untouched.
pub fn run_daily(
    config: &RunConfig,
    data: &MarketData,
    mode: &DailyMode,
    paths: &DailyPaths,
) -> Result<DailyOutcome> {
    let profile = config.allocation_profile();
    profile.validate()?;

    let Some(&date) = data.dates.last() else {
        bail!("no market data available for a daily step");
    };

    let mut portfolio = match load_state(&paths.state)? {
        Some(state) => state.into_portfolio(),
        None => {
            info!(starting_cash = config.starting_cash, "no persisted state, starting fresh");
            Portfolio::new(config.starting_cash)
        }
    };
    if let Some(as_of) = portfolio.as_of {
        if as_of >= date {
            bail!("portfolio already stepped through {as_of}; no newer prices than {date}");
        }
    }

    let prices = data.closes_on(date);
    let outcome = match mode {
        DailyMode::Picks(path) => {
            let picks = read_picks(path)?;
            let weights = allocation::weights_from_picks(&pick_weights(&picks), &profile);
            run_step_with_weights(&mut portfolio, date, &prices, &weights, &profile)
        }
        DailyMode::Autopilot => {
            let scorer = MomentumScorer::new(config.momentum_window);
            let scores = scorer.scores(date, data);
            run_step(&mut portfolio, date, &prices, &scores, &profile)
        }
    };

    // The atomic state replace is the commit point; the logs are appended
    // afterwards so an interrupted run never persists a half-applied day.
    save_state(&paths.state, &PortfolioState::from_portfolio(&portfolio))
        .context("failed to persist portfolio state")?;
    append_equity_jsonl(&paths.equity_log, &outcome.snapshot)?;
    append_trades_jsonl(&paths.trade_log, &outcome.trades)?;

    info!(
        date = %date,
        equity = outcome.snapshot.equity,
        trades = outcome.trades.len(),
        degraded = outcome.degraded,
        "daily step persisted"
    );
    Ok(DailyOutcome {
        snapshot: outcome.snapshot,
        trades: outcome.trades,
        degraded: outcome.degraded,
    })
}
