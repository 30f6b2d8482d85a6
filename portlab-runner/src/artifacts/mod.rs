//! Result artifacts — the append-only equity and trade logs that reporting
//! tooling depends on. Their shape is the contract boundary; nothing
//! downstream reads engine internals.

pub mod equity;
pub mod trades;

pub use equity::{append_equity_jsonl, read_equity_jsonl, write_equity_csv};
pub use trades::{append_trades_jsonl, read_trades_jsonl, write_trades_csv};

use anyhow::Result;
use portlab_core::engine::BacktestReport;
use std::path::Path;

/// Write a completed backtest's artifacts (equity CSV + trades CSV) into
/// `output_dir`.
pub fn save_backtest_artifacts(output_dir: &Path, report: &BacktestReport) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    write_equity_csv(&output_dir.join("equity.csv"), &report.equity_curve)?;
    write_trades_csv(&output_dir.join("trades.csv"), &report.trades)?;
    Ok(())
}
