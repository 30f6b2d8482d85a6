//! End-to-end engine scenarios exercising the full step pipeline.

use chrono::NaiveDate;
use portlab_core::allocation::AllocationProfile;
use portlab_core::domain::{Bar, OrderSide, Portfolio, Position};
use portlab_core::engine::{
    run_backtest, run_step, BacktestConfig, ConstantScores, MarketData,
};
use std::collections::BTreeMap;

fn bar(symbol: &str, day: u32, close: f64) -> Bar {
    Bar {
        symbol: symbol.into(),
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1_000,
    }
}

fn map(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(s, v)| (s.to_string(), *v)).collect()
}

/// $10,000 into a single symbol at 100% allocation, prices 100 → 110 → 90,
/// zero friction: buy 100 shares day one, then ride the marks.
#[test]
fn single_symbol_full_allocation() {
    let mut config = BacktestConfig::new(10_000.0, AllocationProfile::frictionless(1, 1.0));
    config.rebalance_every = 1;
    let data = MarketData::from_bars(vec![
        bar("AAPL", 2, 100.0),
        bar("AAPL", 3, 110.0),
        bar("AAPL", 4, 90.0),
    ]);
    let scorer = ConstantScores(map(&[("AAPL", 1.0)]));

    let report = run_backtest(&config, &data, &scorer).unwrap();

    assert_eq!(report.equity_curve.len(), 3);
    // Day 1: fully invested.
    assert!((report.equity_curve[0].equity - 10_000.0).abs() < 1e-6);
    assert!(report.equity_curve[0].cash.abs() < 1e-6);
    // Day 2: no rebalance needed, equity rides the price.
    assert!((report.equity_curve[1].equity - 11_000.0).abs() < 1e-6);
    // Day 3: drawdown marks through.
    assert!((report.equity_curve[2].equity - 9_000.0).abs() < 1e-6);

    // Exactly one trade: the initial 100-share buy.
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].side, OrderSide::Buy);
    assert!((report.trades[0].quantity - 100.0).abs() < 1e-9);
    assert_eq!(report.degraded_days, 0);
}

/// Two equally-scored symbols under a 50% single-position cap split the
/// account evenly: 50 shares each at $100.
#[test]
fn equal_scores_split_under_cap() {
    let mut portfolio = Portfolio::new(10_000.0);
    let profile = AllocationProfile::frictionless(2, 0.5);
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

    let outcome = run_step(
        &mut portfolio,
        date,
        &map(&[("AAA", 100.0), ("BBB", 100.0)]),
        &map(&[("AAA", 1.0), ("BBB", 1.0)]),
        &profile,
    );

    assert!((portfolio.quantity("AAA") - 50.0).abs() < 1e-9);
    assert!((portfolio.quantity("BBB") - 50.0).abs() < 1e-9);
    assert!(portfolio.cash.abs() < 1e-6);
    assert!((outcome.snapshot.equity - 10_000.0).abs() < 1e-6);
}

/// Selling 50 shares while holding 30 clips the fill to 30 and removes
/// the position.
#[test]
fn oversell_clips_to_held_quantity() {
    let mut portfolio = Portfolio::new(0.0);
    portfolio
        .positions
        .insert("AAPL".into(), Position::new("AAPL".into(), 30.0, 100.0));

    let order = portlab_core::domain::Order::sell("AAPL", 50.0, 100.0);
    let fill = portlab_core::ledger::execute_order(
        &mut portfolio,
        &order,
        &portlab_core::execution::CostModel::frictionless(),
    )
    .unwrap();

    assert!(fill.clipped);
    assert_eq!(fill.quantity, 30.0);
    assert!(!portfolio.has_position("AAPL"));
    assert_eq!(portfolio.cash, 3_000.0);
}

/// A universe with zero symbols produces unchanged snapshots, not errors.
#[test]
fn empty_universe_never_crashes() {
    let mut config = BacktestConfig::new(10_000.0, AllocationProfile::frictionless(5, 1.0));
    config.rebalance_every = 1;
    let report = run_backtest(
        &config,
        &MarketData::default(),
        &ConstantScores::default(),
    )
    .unwrap();
    assert!(report.equity_curve.is_empty());
    assert_eq!(report.final_equity(), 10_000.0);
}

/// A symbol that goes dark mid-window keeps its position marked at the
/// last known value and is not traded until prices return.
#[test]
fn missing_price_day_retains_position() {
    let mut config = BacktestConfig::new(10_000.0, AllocationProfile::frictionless(1, 1.0));
    config.rebalance_every = 1;
    // AAPL trades on days 2 and 4; BBB provides the only price on day 3.
    let data = MarketData::from_bars(vec![
        bar("AAPL", 2, 100.0),
        bar("BBB", 3, 1.0),
        bar("AAPL", 4, 120.0),
    ]);
    let scorer = ConstantScores(map(&[("AAPL", 1.0)]));

    let report = run_backtest(&config, &data, &scorer).unwrap();

    assert_eq!(report.equity_curve.len(), 3);
    // Day 2: AAPL has no price; position marked at avg cost, no trades.
    assert!((report.equity_curve[1].equity - 10_000.0).abs() < 1e-6);
    // Day 3: marks at the new price.
    assert!((report.equity_curve[2].equity - 12_000.0).abs() < 1e-6);
    // Only the initial buy traded.
    assert_eq!(report.trades.len(), 1);
}

/// Replaying the same window yields identical equity and trade logs.
#[test]
fn replay_is_idempotent() {
    let mut config = BacktestConfig::new(10_000.0, AllocationProfile::frictionless(2, 0.6));
    config.rebalance_every = 2;
    config.profile.fee_rate = 0.0005;
    config.profile.slippage_bps = 2.0;
    let bars: Vec<Bar> = (2..20)
        .flat_map(|day| {
            vec![
                bar("AAA", day, 100.0 + day as f64),
                bar("BBB", day, 50.0 - (day as f64) * 0.5),
            ]
        })
        .collect();
    let data = MarketData::from_bars(bars);
    let scorer = ConstantScores(map(&[("AAA", 2.0), ("BBB", 1.0)]));

    let first = run_backtest(&config, &data, &scorer).unwrap();
    let second = run_backtest(&config, &data, &scorer).unwrap();

    assert_eq!(first.equity_curve, second.equity_curve);
    assert_eq!(first.trades, second.trades);
}

/// The accounting identity holds on every day of a frictional backtest.
#[test]
fn equity_identity_holds_throughout() {
    let mut config = BacktestConfig::new(10_000.0, AllocationProfile::frictionless(2, 0.5));
    config.rebalance_every = 1;
    config.profile.fee_rate = 0.001;
    config.profile.slippage_bps = 10.0;
    let bars: Vec<Bar> = (2..25)
        .flat_map(|day| {
            vec![
                bar("AAA", day, 100.0 + (day as f64 * 0.7).sin() * 20.0),
                bar("BBB", day, 80.0 + (day as f64 * 1.3).cos() * 15.0),
            ]
        })
        .collect();
    let data = MarketData::from_bars(bars.clone());
    let scorer = ConstantScores(map(&[("AAA", 1.0), ("BBB", 1.0)]));

    let report = run_backtest(&config, &data, &scorer).unwrap();

    for snap in &report.equity_curve {
        assert!(snap.cash >= 0.0, "cash negative on {}", snap.date);
        assert!(
            (snap.equity - (snap.cash + snap.holdings_value)).abs() < 1e-6,
            "identity broken on {}",
            snap.date
        );
    }
}
