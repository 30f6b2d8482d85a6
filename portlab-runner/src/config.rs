//! Serializable run configuration.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use portlab_core::allocation::{AllocationProfile, RiskProfile};
use portlab_core::engine::BacktestConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Serializable configuration for a simulation run.
///
/// Captures everything needed to reproduce a run: risk profile (plus any
/// numeric overrides), window, universe, starting cash, and rebalance
/// cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Named risk profile the numeric parameters start from.
    pub profile: RiskProfile,

    /// Backtest start date (inclusive). Daily mode ignores the window.
    pub start_date: Option<NaiveDate>,

    /// Backtest end date (inclusive).
    pub end_date: Option<NaiveDate>,

    /// Universe of symbols to consider.
    #[serde(default)]
    pub universe: Vec<String>,

    /// Starting cash for a fresh portfolio.
    pub starting_cash: f64,

    /// Rebalance every N-th trading day (1 = daily).
    #[serde(default = "default_rebalance_every")]
    pub rebalance_every: usize,

    /// Trailing window, in bars, for the momentum scorer.
    #[serde(default = "default_momentum_window")]
    pub momentum_window: usize,

    /// Optional overrides on top of the named profile.
    #[serde(default)]
    pub overrides: ProfileOverrides,
}

fn default_rebalance_every() -> usize {
    5
}

fn default_momentum_window() -> usize {
    20
}

/// Optional per-field overrides applied after the named profile resolves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileOverrides {
    pub top_n: Option<usize>,
    pub max_position_pct: Option<f64>,
    pub fee_rate: Option<f64>,
    pub slippage_bps: Option<f64>,
    pub min_trade_fraction: Option<f64>,
    pub stop_loss_pct: Option<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            profile: RiskProfile::Balanced,
            start_date: None,
            end_date: None,
            universe: Vec::new(),
            starting_cash: 10_000.0,
            rebalance_every: default_rebalance_every(),
            momentum_window: default_momentum_window(),
            overrides: ProfileOverrides::default(),
        }
    }
}

impl RunConfig {
    /// Load from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Resolve the named profile plus overrides into explicit numbers.
    pub fn allocation_profile(&self) -> AllocationProfile {
        let mut profile = AllocationProfile::from_risk_profile(self.profile);
        if let Some(top_n) = self.overrides.top_n {
            profile.top_n = top_n;
        }
        if let Some(cap) = self.overrides.max_position_pct {
            profile.max_position_pct = cap;
        }
        if let Some(fee) = self.overrides.fee_rate {
            profile.fee_rate = fee;
        }
        if let Some(slip) = self.overrides.slippage_bps {
            profile.slippage_bps = slip;
        }
        if let Some(min_trade) = self.overrides.min_trade_fraction {
            profile.min_trade_fraction = min_trade;
        }
        if let Some(stop) = self.overrides.stop_loss_pct {
            profile.stop_loss_pct = stop;
        }
        profile
    }

    /// Engine-level config for this run.
    pub fn backtest_config(&self) -> BacktestConfig {
        let mut config = BacktestConfig::new(self.starting_cash, self.allocation_profile());
        config.rebalance_every = self.rebalance_every;
        config
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share the same RunId, which makes
    /// result artifacts content-addressable.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        hash.to_hex().to_string()
    }
}
