//! Risk profiles — named presets resolved to explicit numeric parameters.
//!
//! A profile name is only a lookup key: all simulation behavior flows from
//! the resolved [`AllocationProfile`] struct, so backtests never depend on
//! implicit preset semantics. Unknown names are rejected up front with
//! [`ConfigError::UnknownProfile`] before any simulation state is touched.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors. Always fatal, raised before the first simulated day.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown risk profile: {0} (expected conservative, balanced, or aggressive)")]
    UnknownProfile(String),
    #[error("invalid profile parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Named risk presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl FromStr for RiskProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "balanced" => Ok(Self::Balanced),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

/// How selected symbols share the invested fraction of equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightingScheme {
    /// Every selected symbol gets the same weight.
    #[default]
    EqualWeight,
    /// Weight proportional to rank: best gets k parts, worst gets 1 part.
    RankWeight,
}

/// Fully resolved allocation parameters for a run.
///
/// Every numeric knob is explicit here; the named presets below are just
/// convenient starting points and each field can be overridden by config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationProfile {
    /// How many top-ranked symbols to hold.
    pub top_n: usize,
    pub weighting: WeightingScheme,
    /// Cap on any single position as a fraction of equity.
    pub max_position_pct: f64,
    /// Proportional fee on fill notional (e.g. 0.0005 = 5 bps).
    pub fee_rate: f64,
    /// Slippage in basis points applied against the trader.
    pub slippage_bps: f64,
    /// Orders below this fraction of equity are suppressed (churn guard).
    pub min_trade_fraction: f64,
    /// Liquidate a position once price falls this far below average cost.
    pub stop_loss_pct: f64,
}

impl AllocationProfile {
    /// Resolve a named preset to concrete numbers.
    pub fn from_risk_profile(profile: RiskProfile) -> Self {
        match profile {
            RiskProfile::Conservative => Self {
                top_n: 5,
                weighting: WeightingScheme::EqualWeight,
                max_position_pct: 0.02,
                fee_rate: 0.0005,
                slippage_bps: 2.0,
                min_trade_fraction: 0.002,
                stop_loss_pct: 0.03,
            },
            RiskProfile::Balanced => Self {
                top_n: 10,
                weighting: WeightingScheme::EqualWeight,
                max_position_pct: 0.05,
                fee_rate: 0.0005,
                slippage_bps: 2.0,
                min_trade_fraction: 0.002,
                stop_loss_pct: 0.07,
            },
            RiskProfile::Aggressive => Self {
                top_n: 20,
                weighting: WeightingScheme::RankWeight,
                max_position_pct: 0.08,
                fee_rate: 0.0005,
                slippage_bps: 2.0,
                min_trade_fraction: 0.002,
                stop_loss_pct: 0.15,
            },
        }
    }

    /// Resolve from a profile name, rejecting unknown names.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_risk_profile(name.parse()?))
    }

    /// A frictionless profile for tests: no fees, no slippage, no churn
    /// guard, no stop-loss.
    pub fn frictionless(top_n: usize, max_position_pct: f64) -> Self {
        Self {
            top_n,
            weighting: WeightingScheme::EqualWeight,
            max_position_pct,
            fee_rate: 0.0,
            slippage_bps: 0.0,
            min_trade_fraction: 0.0,
            stop_loss_pct: 1.0,
        }
    }

    /// Validate parameter ranges. Fatal before any simulation step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "top_n",
                value: 0.0,
            });
        }
        if !(0.0..=1.0).contains(&self.max_position_pct) || self.max_position_pct == 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_position_pct",
                value: self.max_position_pct,
            });
        }
        if self.fee_rate < 0.0 || self.fee_rate >= 1.0 {
            return Err(ConfigError::InvalidParameter {
                name: "fee_rate",
                value: self.fee_rate,
            });
        }
        if self.slippage_bps < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "slippage_bps",
                value: self.slippage_bps,
            });
        }
        if !(0.0..=1.0).contains(&self.stop_loss_pct) {
            return Err(ConfigError::InvalidParameter {
                name: "stop_loss_pct",
                value: self.stop_loss_pct,
            });
        }
        Ok(())
    }
}
