//! In-memory, time-aligned price history.
//!
//! The engine never fetches data; an external collaborator hands it a
//! fully-built `MarketData` snapshot. Dates are the union of all symbols'
//! bar dates, sorted and deduplicated — a symbol simply has no entry on a
//! date it did not trade.

use crate::domain::{Bar, Symbol};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Price history for a universe of symbols over a date range.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    /// All trading dates covered, strictly increasing.
    pub dates: Vec<NaiveDate>,
    /// Per symbol: date → bar.
    pub bars: BTreeMap<Symbol, BTreeMap<NaiveDate, Bar>>,
}

impl MarketData {
    /// Build from a flat bar list. Invalid bars (non-positive or NaN close)
    /// are dropped; a later bar for the same (symbol, date) wins.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let mut by_symbol: BTreeMap<Symbol, BTreeMap<NaiveDate, Bar>> = BTreeMap::new();
        for bar in bars {
            if !bar.is_valid() {
                continue;
            }
            by_symbol
                .entry(bar.symbol.clone())
                .or_default()
                .insert(bar.date, bar);
        }
        let mut dates: Vec<NaiveDate> = by_symbol
            .values()
            .flat_map(|series| series.keys().copied())
            .collect();
        dates.sort_unstable();
        dates.dedup();
        Self {
            dates,
            bars: by_symbol,
        }
    }

    pub fn symbols(&self) -> Vec<&Symbol> {
        self.bars.keys().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Close prices for every symbol that has a valid bar on `date`.
    /// Symbols without one are simply absent from the map.
    pub fn closes_on(&self, date: NaiveDate) -> BTreeMap<Symbol, f64> {
        self.bars
            .iter()
            .filter_map(|(symbol, series)| {
                series.get(&date).map(|bar| (symbol.clone(), bar.close))
            })
            .collect()
    }

    /// Closing prices for one symbol, strictly before or on `date`,
    /// oldest first. Used by trailing-window scorers.
    pub fn closes_through(&self, symbol: &str, date: NaiveDate) -> Vec<f64> {
        self.bars
            .get(symbol)
            .map(|series| {
                series
                    .range(..=date)
                    .map(|(_, bar)| bar.close)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Most recent close for a symbol on or before `date`.
    pub fn last_close(&self, symbol: &str, date: NaiveDate) -> Option<f64> {
        self.bars
            .get(symbol)?
            .range(..=date)
            .next_back()
            .map(|(_, bar)| bar.close)
    }
}
