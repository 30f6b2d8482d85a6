//! Market data ingestion from bar CSV files.

use csv::ReaderBuilder;
use portlab_core::domain::Bar;
use portlab_core::engine::MarketData;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read bars file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bars file {0} contains no usable rows")]
    Empty(String),
}

#[derive(Debug, Deserialize)]
struct BarRow {
    date: chrono::NaiveDate,
    symbol: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: u64,
}

/// Read daily bars from a CSV with a
/// `date,symbol,open,high,low,close,volume` header.
///
/// Rows that fail to parse are skipped with a warning; invalid bars
/// (non-finite or non-positive close) are dropped by `MarketData` itself.
pub fn read_bars_csv(path: &Path) -> Result<MarketData, DataError> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| match err.into_kind() {
            csv::ErrorKind::Io(source) => DataError::Io {
                path: path.display().to_string(),
                source,
            },
            other => DataError::Io {
                path: path.display().to_string(),
                source: std::io::Error::other(format!("{other:?}")),
            },
        })?;

    let mut bars = Vec::new();
    for (index, row) in reader.deserialize::<BarRow>().enumerate() {
        match row {
            Ok(row) => bars.push(Bar {
                symbol: row.symbol,
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            }),
            Err(err) => {
                warn!(path = %path.display(), row = index + 1, %err, "skipping malformed bar row")
            }
        }
    }

    if bars.is_empty() {
        return Err(DataError::Empty(path.display().to_string()));
    }
    Ok(MarketData::from_bars(bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_bars_grouped_by_symbol() {
        let file = write_csv(
            "date,symbol,open,high,low,close,volume\n\
             2024-01-02,AAPL,99.0,101.0,98.0,100.0,1000\n\
             2024-01-03,AAPL,100.0,111.0,100.0,110.0,1200\n\
             2024-01-02,MSFT,200.0,202.0,199.0,201.0,900\n",
        );
        let data = read_bars_csv(file.path()).unwrap();
        assert_eq!(data.symbols().len(), 2);
        assert_eq!(data.dates.len(), 2);
        assert_eq!(data.bars["AAPL"].len(), 2);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let file = write_csv(
            "date,symbol,open,high,low,close,volume\n\
             2024-01-02,AAPL,99.0,101.0,98.0,100.0,1000\n\
             not-a-date,AAPL,1,2,3,4,5\n",
        );
        let data = read_bars_csv(file.path()).unwrap();
        assert_eq!(data.dates.len(), 1);
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_csv("date,symbol,open,high,low,close,volume\n");
        assert!(matches!(
            read_bars_csv(file.path()),
            Err(DataError::Empty(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            read_bars_csv(Path::new("/nonexistent/bars.csv")),
            Err(DataError::Io { .. })
        ));
    }
}
