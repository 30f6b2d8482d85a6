//! Picks file ingestion — the `symbol,score,weight` CSV handed to daily
//! mode by an external ranking pipeline.

use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PicksError {
    #[error("failed to read picks file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("picks file {0} contains no usable rows")]
    Empty(String),
}

/// One ranked pick with an optional pre-assigned target weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub symbol: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
struct PickRow {
    symbol: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    weight: f64,
}

/// Read picks from a CSV with a `symbol,score,weight` header.
///
/// Malformed rows are skipped with a warning; a file yielding zero usable
/// rows is an error (daily mode must not silently rebalance to nothing).
pub fn read_picks(path: &Path) -> Result<Vec<Pick>, PicksError> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| match err.into_kind() {
            csv::ErrorKind::Io(source) => PicksError::Io {
                path: path.display().to_string(),
                source,
            },
            other => PicksError::Io {
                path: path.display().to_string(),
                source: std::io::Error::other(format!("{other:?}")),
            },
        })?;

    let mut picks = Vec::new();
    for (index, row) in reader.deserialize::<PickRow>().enumerate() {
        match row {
            Ok(row) if !row.symbol.is_empty() => picks.push(Pick {
                symbol: row.symbol,
                score: row.score,
                weight: row.weight,
            }),
            Ok(_) => warn!(path = %path.display(), row = index + 1, "skipping pick with empty symbol"),
            Err(err) => {
                warn!(path = %path.display(), row = index + 1, %err, "skipping malformed pick row")
            }
        }
    }

    if picks.is_empty() {
        return Err(PicksError::Empty(path.display().to_string()));
    }
    Ok(picks)
}

/// Weighted (symbol, weight) pairs; falls back to score-ranked equal
/// weighting when the file carries no explicit weights.
pub fn pick_weights(picks: &[Pick]) -> Vec<(String, f64)> {
    let has_weights = picks.iter().any(|p| p.weight > 0.0);
    if has_weights {
        picks
            .iter()
            .map(|p| (p.symbol.clone(), p.weight.max(0.0)))
            .collect()
    } else {
        let equal = 1.0 / picks.len() as f64;
        picks.iter().map(|p| (p.symbol.clone(), equal)).collect()
    }
}
