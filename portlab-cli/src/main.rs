//! PortLab CLI — portfolio rebalancing simulator.
//!
//! Commands:
//! - `backtest` — run a full historical simulation over a bar CSV (or a
//!   seeded synthetic market) and save equity/trade artifacts
//! - `daily` — execute one persisted daily step against a picks CSV
//! - `autopilot` — execute one persisted daily step with in-process ranking

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use portlab_core::engine::MarketData;
use portlab_runner::daily::{run_daily, DailyMode, DailyPaths};
use portlab_runner::{
    read_bars_csv, run_single_backtest, save_backtest_artifacts, synthetic_market,
    BacktestSummary, MomentumScorer, RunConfig,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "portlab",
    about = "PortLab CLI — single-account portfolio rebalancing simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full backtest over historical bars.
    Backtest {
        /// Path to a TOML run config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bar CSV (date,symbol,open,high,low,close,volume).
        #[arg(long)]
        bars: Option<PathBuf>,

        /// Use a seeded synthetic market instead of a bars file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Synthetic market: number of trading days.
        #[arg(long, default_value_t = 250)]
        days: usize,

        /// Synthetic market: RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output directory for equity.csv / trades.csv.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Execute one persisted daily step, rebalancing to a picks CSV.
    Daily {
        /// Path to a TOML run config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bar CSV (date,symbol,open,high,low,close,volume).
        #[arg(long)]
        bars: PathBuf,

        /// Picks CSV (symbol,score,weight).
        #[arg(long)]
        picks: PathBuf,

        /// Directory holding state/portfolio.json and the JSONL logs.
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,
    },
    /// Execute one persisted daily step with in-process momentum ranking.
    Autopilot {
        /// Path to a TOML run config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bar CSV (date,symbol,open,high,low,close,volume).
        #[arg(long)]
        bars: PathBuf,

        /// Directory holding state/portfolio.json and the JSONL logs.
        #[arg(long, default_value = "artifacts")]
        artifacts_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Backtest {
            config,
            bars,
            synthetic,
            days,
            seed,
            output_dir,
        } => run_backtest_cmd(config, bars, synthetic, days, seed, output_dir),
        Commands::Daily {
            config,
            bars,
            picks,
            artifacts_dir,
        } => run_daily_cmd(config, bars, DailyMode::Picks(picks), artifacts_dir),
        Commands::Autopilot {
            config,
            bars,
            artifacts_dir,
        } => run_daily_cmd(config, bars, DailyMode::Autopilot, artifacts_dir),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::from_toml_file(&path),
        None => Ok(RunConfig::default()),
    }
}

fn run_backtest_cmd(
    config_path: Option<PathBuf>,
    bars: Option<PathBuf>,
    synthetic: bool,
    days: usize,
    seed: u64,
    output_dir: PathBuf,
) -> Result<()> {
    if bars.is_some() && synthetic {
        bail!("--bars and --synthetic are mutually exclusive");
    }
    let config = load_config(config_path)?;

    let data = match bars {
        Some(path) => read_bars_csv(&path)?,
        None if synthetic => {
            let symbols: Vec<&str> = if config.universe.is_empty() {
                vec!["AAA", "BBB", "CCC", "DDD", "EEE"]
            } else {
                config.universe.iter().map(|s| s.as_str()).collect()
            };
            synthetic_market(&symbols, days, seed)
        }
        None => bail!("one of --bars or --synthetic is required"),
    };

    let scorer = MomentumScorer::new(config.momentum_window);
    let summary = run_single_backtest(&config, &data, &scorer)?;
    print_summary(&summary, synthetic);

    save_backtest_artifacts(&output_dir, &summary.report)?;
    println!("Artifacts saved to: {}", output_dir.display());
    Ok(())
}

fn run_daily_cmd(
    config_path: Option<PathBuf>,
    bars: PathBuf,
    mode: DailyMode,
    artifacts_dir: PathBuf,
) -> Result<()> {
    let config = load_config(config_path)?;
    let data: MarketData = read_bars_csv(&bars)?;
    let paths = DailyPaths::under(&artifacts_dir);

    let outcome = run_daily(&config, &data, &mode, &paths)?;

    println!();
    println!("=== Daily Step ===");
    println!("Date:       {}", outcome.snapshot.date);
    println!("Cash:       {:.2}", outcome.snapshot.cash);
    println!("Holdings:   {:.2}", outcome.snapshot.holdings_value);
    println!("Equity:     {:.2}", outcome.snapshot.equity);
    println!("Trades:     {}", outcome.trades.len());
    for trade in &outcome.trades {
        println!(
            "  {} {:?} {:.4} {} @ {:.4} (fee {:.4})",
            trade.date, trade.side, trade.quantity, trade.symbol, trade.price, trade.fee
        );
    }
    if outcome.degraded {
        println!("WARNING: degraded day (no usable prices or scores)");
    }
    println!("State:      {}", paths.state.display());
    Ok(())
}

fn print_summary(summary: &BacktestSummary, synthetic: bool) {
    let report = &summary.report;
    println!();
    println!("=== Backtest Result ===");
    println!("Run ID:         {}", summary.run_id);
    if let (Some(first), Some(last)) = (report.equity_curve.first(), report.equity_curve.last()) {
        println!("Period:         {} to {}", first.date, last.date);
    }
    println!("Days:           {}", summary.metrics.num_days);
    println!("Trades:         {}", report.trades.len());
    println!("Degraded days:  {}", report.degraded_days);
    println!();
    println!("--- Performance ---");
    println!("Final Equity:   {:.2}", report.final_equity());
    println!(
        "Total Return:   {:.2}%",
        summary.metrics.total_return * 100.0
    );
    println!(
        "Max Drawdown:   {:.2}%",
        summary.metrics.max_drawdown * 100.0
    );
    println!("Sharpe:         {:.3}", summary.metrics.sharpe);
    if synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
