//! Engine — market data snapshot, ranking seam, per-day step, and the
//! backtest driver built on top of them.

pub mod backtest;
pub mod data;
pub mod scores;
pub mod step;

pub use backtest::{run_backtest, BacktestConfig, BacktestReport};
pub use data::MarketData;
pub use scores::{ConstantScores, PrecomputedScores, ScoreProvider};
pub use step::{run_hold_step, run_step, run_step_with_weights, StepOutcome};
