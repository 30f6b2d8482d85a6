//! Trade log — append-only JSONL plus CSV export.

use anyhow::{Context, Result};
use portlab_core::domain::{OrderSide, TradeRecord};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append the day's trades to the JSONL log, one record per fill.
pub fn append_trades_jsonl(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    if trades.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open trade log {}", path.display()))?;
    for trade in trades {
        let line = serde_json::to_string(trade).context("failed to serialize trade record")?;
        writeln!(file, "{line}")?;
    }
    file.flush()?;
    Ok(())
}

/// Read the full trade log back.
pub fn read_trades_jsonl(path: &Path) -> Result<Vec<TradeRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trade log {}", path.display()))?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("failed to parse trade log line"))
        .collect()
}

/// Write the whole trade tape as CSV (backtest export).
pub fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;
    writeln!(file, "date,symbol,side,quantity,price,fee,cash_after")?;
    for trade in trades {
        let side = match trade.side {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        };
        writeln!(
            file,
            "{},{},{},{:.6},{:.4},{:.4},{:.4}",
            trade.date, trade.symbol, side, trade.quantity, trade.price, trade.fee, trade.cash_after
        )?;
    }
    Ok(())
}
