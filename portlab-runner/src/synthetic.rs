//! Seeded synthetic price series for tests and demos.

use chrono::NaiveDate;
use portlab_core::domain::Bar;
use portlab_core::engine::MarketData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a seeded random-walk `MarketData` for the given symbols.
///
/// Each symbol starts near $100 and takes ±2% daily steps. The same seed
/// always produces the same data, so fixtures are reproducible.
pub fn synthetic_market(symbols: &[&str], days: usize, seed: u64) -> MarketData {
    let mut rng = StdRng::seed_from_u64(seed);
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(symbols.len() * days);

    for symbol in symbols {
        let mut close: f64 = 80.0 + rng.gen_range(0.0..40.0);
        for day in 0..days {
            let step = rng.gen_range(-0.02..0.02);
            close = (close * (1.0 + step)).max(1.0);
            bars.push(Bar {
                symbol: symbol.to_string(),
                date: base_date + chrono::Duration::days(day as i64),
                open: close * 0.999,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: rng.gen_range(100_000..2_000_000),
            });
        }
    }
    MarketData::from_bars(bars)
}
