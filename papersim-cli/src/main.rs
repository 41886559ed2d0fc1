//! PaperSim CLI — backtest, compare, and bot commands.
//!
//! Commands:
//! - `backtest` — run one strategy over synthetic or CSV prices
//! - `compare`  — run every strategy over the same series, ranked
//! - `bot`      — drive the live paper-trading loop against the wall clock

use anyhow::Result;
use clap::{Parser, Subcommand};
use papersim_core::bot::{BotEvent, BotLoop, BotParams, PaperBot};
use papersim_core::engine::PerformanceReport;
use papersim_core::strategy::Strategy;
use papersim_runner::config::{DataConfig, RunConfig, SyntheticConfig};
use papersim_runner::data::load_prices;
use papersim_runner::export::save_artifacts;
use papersim_runner::runner::run_single_backtest;
use papersim_runner::sweep::compare_strategies;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(
    name = "papersim",
    about = "PaperSim CLI — paper-trading strategy sandbox"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest and print its performance report.
    Backtest {
        /// Path to a TOML config file (overrides the flags below).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strategy: buy-low-sell-high, trend-following, mean-reversion,
        /// momentum, bollinger-bands.
        #[arg(long, default_value = "buy-low-sell-high")]
        strategy: Strategy,

        /// Initial balance in dollars.
        #[arg(long, default_value_t = 10_000.0)]
        balance: f64,

        /// Transaction fee in percent.
        #[arg(long, default_value_t = 0.1)]
        fee: f64,

        /// Synthetic series length in ticks.
        #[arg(long, default_value_t = 365)]
        length: usize,

        /// Seed for the synthetic series.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// CSV file with one price per row (replaces the synthetic series).
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Write report.json / equity.csv / trades.csv here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Run every strategy over the same series and rank them.
    Compare {
        #[arg(long, default_value_t = 10_000.0)]
        balance: f64,

        #[arg(long, default_value_t = 0.1)]
        fee: f64,

        #[arg(long, default_value_t = 365)]
        length: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// CSV file with one price per row (replaces the synthetic series).
        #[arg(long)]
        prices: Option<PathBuf>,
    },
    /// Run the live paper-trading bot for a fixed duration.
    Bot {
        #[arg(long, default_value = "buy-low-sell-high")]
        strategy: Strategy,

        /// Shares per trade.
        #[arg(long, default_value_t = 5)]
        quantity: u64,

        /// Market volatility in percent per tick.
        #[arg(long, default_value_t = 5.0)]
        volatility: f64,

        /// Market trend, -5 (bearish) to 5 (bullish).
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        trend: f64,

        /// How long to run, in seconds.
        #[arg(long, default_value_t = 30)]
        duration: u64,

        /// Price tick period in milliseconds.
        #[arg(long, default_value_t = 1_000)]
        price_ms: u64,

        /// Decision tick period in milliseconds.
        #[arg(long, default_value_t = 2_000)]
        decision_ms: u64,

        #[arg(long, default_value_t = 0)]
        seed: u64,
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
            strategy,
            balance,
            fee,
            length,
            seed,
            prices,
            output_dir,
        } => {
            let run_config = match config {
                Some(path) => RunConfig::from_toml_file(&path)?,
                None => {
                    let mut run_config = RunConfig::new(strategy, balance, fee);
                    run_config.data = data_config(prices, length, seed);
                    run_config
                }
            };

            let outcome = run_single_backtest(&run_config)?;
            print_report(&run_config.strategy, &outcome.report);

            if let Some(dir) = output_dir {
                let paths = save_artifacts(&outcome, &dir)?;
                for path in paths {
                    println!("wrote {}", path.display());
                }
            }
            Ok(())
        }
        Commands::Compare {
            balance,
            fee,
            length,
            seed,
            prices,
        } => {
            let series = load_prices(&data_config(prices, length, seed))?;
            let results = compare_strategies(&series, balance, fee)?;

            println!(
                "{:<20} {:>14} {:>9} {:>8} {:>9} {:>8}",
                "strategy", "final value", "return%", "trades", "win rate", "sharpe"
            );
            for entry in &results {
                let report = &entry.report;
                println!(
                    "{:<20} {:>14.2} {:>9.2} {:>8} {:>8.1}% {:>8.2}",
                    entry.strategy.to_string(),
                    report.final_portfolio_value,
                    report.total_return_pct,
                    report.trades_executed,
                    report.win_rate,
                    report.sharpe_ratio,
                );
            }
            Ok(())
        }
        Commands::Bot {
            strategy,
            quantity,
            volatility,
            trend,
            duration,
            price_ms,
            decision_ms,
            seed,
        } => {
            let params = BotParams {
                strategy,
                trade_quantity: quantity,
                volatility_pct: volatility,
                trend_pct: trend,
                seed,
                ..BotParams::default()
            };
            run_bot(
                params,
                Duration::from_millis(price_ms),
                Duration::from_millis(decision_ms),
                Duration::from_secs(duration),
            );
            Ok(())
        }
    }
}

fn data_config(prices: Option<PathBuf>, length: usize, seed: u64) -> DataConfig {
    match prices {
        Some(path) => DataConfig::Csv { path },
        None => DataConfig::Synthetic(SyntheticConfig { length, seed }),
    }
}

fn print_report(strategy: &Strategy, report: &PerformanceReport) {
    println!("strategy:          {strategy}");
    println!("                   {}", strategy.description());
    println!("start balance:     ${:.2}", report.start_balance);
    println!("final value:       ${:.2}", report.final_portfolio_value);
    println!(
        "total return:      {:+.2}% (annualized {:+.2}%)",
        report.total_return_pct, report.annualized_return_pct
    );
    println!("trades executed:   {}", report.trades_executed);
    println!("win rate:          {:.1}%", report.win_rate);
    println!("max drawdown:      {:.2}%", report.max_drawdown_pct);
    println!("sharpe ratio:      {:.2}", report.sharpe_ratio);
    println!("volatility:        {:.2}%", report.volatility_pct);
    println!(
        "streaks:           {} wins / {} losses",
        report.max_consecutive_wins, report.max_consecutive_losses
    );
    println!(
        "avg win / loss:    ${:.2} / ${:.2}",
        report.avg_win_amount, report.avg_loss_amount
    );
}

/// Drive the bot loop against the wall clock for a fixed duration.
fn run_bot(
    params: BotParams,
    price_period: Duration,
    decision_period: Duration,
    run_for: Duration,
) {
    let mut bot_loop = BotLoop::new(PaperBot::new(params), price_period, decision_period);
    let start = Instant::now();
    bot_loop.start(start);
    println!(
        "bot running: {} for {}s (Ctrl-C to abort)",
        params.strategy,
        run_for.as_secs()
    );

    let poll = price_period.min(decision_period).min(Duration::from_millis(250));
    while start.elapsed() < run_for {
        std::thread::sleep(poll);
        for event in bot_loop.advance(Instant::now()) {
            match event {
                BotEvent::Price(price) => {
                    tracing::debug!(price, "tick");
                }
                BotEvent::Trade(trade) => {
                    println!(
                        "[tick {:>4}] {:<4} {} @ ${:.2}  cash ${:.2}",
                        trade.tick,
                        trade.side.as_str(),
                        trade.quantity,
                        trade.price,
                        trade.cash_after,
                    );
                }
            }
        }
    }

    bot_loop.stop();
    let bot = bot_loop.bot();
    println!("---");
    println!("price ticks:       {}", bot.tick_count());
    println!("trades executed:   {}", bot.trades().len());
    println!("final price:       ${:.2}", bot.last_price());
    println!("cash:              ${:.2}", bot.portfolio().cash);
    println!("holdings:          {} shares", bot.portfolio().holdings);
    println!("portfolio value:   ${:.2}", bot.total_value());
    println!("realized P&L:      ${:+.2} (FIFO)", bot.realized_pnl());
}
