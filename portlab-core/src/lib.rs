//! PortLab Core — portfolio rebalancing engine.
//!
//! This crate contains the heart of the simulator:
//! - Domain types (bars, orders, fills, positions, portfolio, snapshots)
//! - Allocation policy (named risk profiles resolved to explicit numbers)
//! - Execution simulator (sells-before-buys rebalance orders, cost model)
//! - Portfolio ledger (the only code that mutates cash and positions)
//! - Per-day step shared by backtest and daily modes, plus the backtest
//!   driver
//!
//! The crate does no file or network I/O: prices and scores arrive as
//! in-memory snapshots, and persistence lives in `portlab-runner`.

pub mod allocation;
pub mod domain;
pub mod engine;
pub mod execution;
pub mod ledger;
