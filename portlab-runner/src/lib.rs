//! PortLab Runner — orchestration around the core engine.
//!
//! This crate builds on `portlab-core` to provide:
//! - Serializable run configuration with content-addressed run IDs
//! - Persisted portfolio state (atomic load/save for daily mode)
//! - Picks and bar CSV ingestion
//! - Append-only equity/trade artifacts
//! - The one-shot daily/autopilot runner
//! - Built-in momentum ranking and headline performance metrics
//! - Seeded synthetic market data for tests and demos

pub mod artifacts;
pub mod config;
pub mod daily;
pub mod data;
pub mod metrics;
pub mod picks;
pub mod runner;
pub mod scoring;
pub mod state;
pub mod synthetic;

pub use artifacts::{save_backtest_artifacts, write_equity_csv, write_trades_csv};
pub use config::{ProfileOverrides, RunConfig, RunId};
pub use daily::{run_daily, DailyMode, DailyOutcome, DailyPaths};
pub use data::{read_bars_csv, DataError};
pub use metrics::PerformanceMetrics;
pub use picks::{read_picks, Pick, PicksError};
pub use runner::{filter_market, run_single_backtest, BacktestSummary};
pub use scoring::MomentumScorer;
pub use state::{load_state, save_state, PortfolioState, StateError};
pub use synthetic::synthetic_market;
