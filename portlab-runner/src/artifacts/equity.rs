//! Equity log — append-only JSONL plus CSV export.

use anyhow::{Context, Result};
use portlab_core::domain::EquitySnapshot;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append one equity snapshot to the JSONL log, flushed immediately so an
/// interrupted run keeps every completed day.
pub fn append_equity_jsonl(path: &Path, snapshot: &EquitySnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open equity log {}", path.display()))?;
    let line = serde_json::to_string(snapshot).context("failed to serialize equity snapshot")?;
    writeln!(file, "{line}")?;
    file.flush()?;
    Ok(())
}

/// Read the full equity log back (reporting and tests).
pub fn read_equity_jsonl(path: &Path) -> Result<Vec<EquitySnapshot>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read equity log {}", path.display()))?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("failed to parse equity log line"))
        .collect()
}

/// Write a whole equity curve as CSV (backtest export).
pub fn write_equity_csv(path: &Path, equity: &[EquitySnapshot]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writeln!(file, "date,cash,holdings_value,equity")?;
    for snap in equity {
        writeln!(
            file,
            "{},{:.4},{:.4},{:.4}",
            snap.date, snap.cash, snap.holdings_value, snap.equity
        )?;
    }
    Ok(())
}
