//! Persisted portfolio state for daily/autopilot mode.
//!
//! The state file is an explicit, versioned snapshot passed into and out of
//! the daily runner — never ambient global state. Loading distinguishes
//! three cases: present and valid (resume), absent (caller starts fresh),
//! and corrupt (fail fast — daily mode refuses to guess, so data loss is
//! never silently masked by a fresh start).
//!
//! Saving is a single scoped write: serialize to a temp file in the target
//! directory, then atomically rename over the old state. An interrupted
//! save leaves the previous state intact.

use chrono::NaiveDate;
use portlab_core::domain::{Portfolio, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Bump when the on-disk layout changes incompatibly.
pub const STATE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("corrupt portfolio state at {path}: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("unsupported state schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },
    #[error("failed to write portfolio state: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk snapshot of the portfolio between daily invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioState {
    pub schema_version: u32,
    pub as_of: Option<NaiveDate>,
    pub cash: f64,
    /// symbol → (quantity, average cost)
    pub positions: BTreeMap<String, PositionState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionState {
    pub quantity: f64,
    pub avg_cost: f64,
}

impl PortfolioState {
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION,
            as_of: portfolio.as_of,
            cash: portfolio.cash,
            positions: portfolio
                .positions
                .iter()
                .map(|(symbol, pos)| {
                    (
                        symbol.clone(),
                        PositionState {
                            quantity: pos.quantity,
                            avg_cost: pos.avg_cost,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn into_portfolio(self) -> Portfolio {
        let mut portfolio = Portfolio::new(self.cash);
        portfolio.as_of = self.as_of;
        for (symbol, state) in self.positions {
            if state.quantity > 0.0 {
                portfolio.positions.insert(
                    symbol.clone(),
                    Position::new(symbol, state.quantity, state.avg_cost),
                );
            }
        }
        portfolio
    }

    fn validate(&self) -> Result<(), String> {
        if !self.cash.is_finite() || self.cash < 0.0 {
            return Err(format!("negative or non-finite cash: {}", self.cash));
        }
        for (symbol, pos) in &self.positions {
            if !pos.quantity.is_finite() || pos.quantity < 0.0 {
                return Err(format!("bad quantity for {symbol}: {}", pos.quantity));
            }
            if !pos.avg_cost.is_finite() || pos.avg_cost < 0.0 {
                return Err(format!("bad avg_cost for {symbol}: {}", pos.avg_cost));
            }
        }
        Ok(())
    }
}

/// Load persisted state. `Ok(None)` means no state file exists yet — the
/// caller creates a fresh portfolio with configured starting cash.
pub fn load_state(path: &Path) -> Result<Option<PortfolioState>, StateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let state: PortfolioState =
        serde_json::from_str(&content).map_err(|err| StateError::Corrupt {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
    if state.schema_version != STATE_SCHEMA_VERSION {
        return Err(StateError::SchemaVersion {
            found: state.schema_version,
            expected: STATE_SCHEMA_VERSION,
        });
    }
    state.validate().map_err(|reason| StateError::Corrupt {
        path: path.display().to_string(),
        reason,
    })?;
    Ok(Some(state))
}

/// Persist state atomically: temp file in the same directory, fsync, rename.
pub fn save_state(path: &Path, state: &PortfolioState) -> Result<(), StateError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(state).map_err(|err| StateError::Corrupt {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
