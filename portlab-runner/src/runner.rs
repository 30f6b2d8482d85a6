//! Single-backtest orchestration: window/universe filtering, engine run,
//! metrics.

use crate::config::RunConfig;
use crate::metrics::PerformanceMetrics;
use anyhow::{bail, Result};
use portlab_core::engine::{run_backtest, BacktestReport, MarketData, ScoreProvider};

/// A completed backtest with its config hash and headline metrics.
#[derive(Debug, Clone)]
pub struct BacktestSummary {
    pub run_id: String,
    pub report: BacktestReport,
    pub metrics: PerformanceMetrics,
}

/// Restrict market data to the config's universe and date window.
pub fn filter_market(config: &RunConfig, data: &MarketData) -> MarketData {
    let bars = data
        .bars
        .iter()
        .filter(|(symbol, _)| {
            config.universe.is_empty() || config.universe.iter().any(|u| u == *symbol)
        })
        .flat_map(|(_, series)| series.values().cloned())
        .filter(|bar| {
            config.start_date.map_or(true, |start| bar.date >= start)
                && config.end_date.map_or(true, |end| bar.date <= end)
        })
        .collect();
    MarketData::from_bars(bars)
}

/// Run one backtest over the configured window.
pub fn run_single_backtest(
    config: &RunConfig,
    data: &MarketData,
    scorer: &dyn ScoreProvider,
) -> Result<BacktestSummary> {
    let filtered = filter_market(config, data);
    if filtered.is_empty() {
        bail!("no market data in the configured window/universe");
    }
    let report = run_backtest(&config.backtest_config(), &filtered, scorer)?;
    let metrics = PerformanceMetrics::from_equity_curve(&report.equity_curve);
    Ok(BacktestSummary {
        run_id: config.run_id(),
        report,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MomentumScorer;
    use crate::synthetic::synthetic_market;
    use chrono::NaiveDate;

    #[test]
    fn filter_respects_universe_and_window() {
        let config = RunConfig {
            universe: vec!["AAA".into()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            ..RunConfig::default()
        };
        let data = synthetic_market(&["AAA", "BBB"], 40, 3);
        let filtered = filter_market(&config, &data);
        assert_eq!(filtered.symbols().len(), 1);
        assert!(filtered
            .dates
            .iter()
            .all(|d| *d >= config.start_date.unwrap() && *d <= config.end_date.unwrap()));
    }

    #[test]
    fn backtest_over_synthetic_data_completes() {
        let config = RunConfig {
            rebalance_every: 5,
            ..RunConfig::default()
        };
        let data = synthetic_market(&["AAA", "BBB", "CCC"], 60, 11);
        let summary =
            run_single_backtest(&config, &data, &MomentumScorer::new(config.momentum_window))
                .unwrap();
        assert_eq!(summary.report.equity_curve.len(), 60);
        assert!(summary.report.final_equity() > 0.0);
        assert_eq!(summary.metrics.num_days, 60);
    }

    #[test]
    fn empty_window_is_an_error() {
        let config = RunConfig {
            universe: vec!["NOPE".into()],
            ..RunConfig::default()
        };
        let data = synthetic_market(&["AAA"], 10, 1);
        assert!(run_single_backtest(&config, &data, &MomentumScorer::default()).is_err());
    }
}
