use anyhow::Context;
use backtester::Backtester;
use clap::{Parser, Subcommand};
use configuration::{Config, init_tracing, load_config, load_sweep_config};
use feed::HistoricFeed;
use optimizer::Optimizer;
use std::path::PathBuf;

mod display;
mod loader;

/// The main entry point for the Hindsight backtester.
fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    // Held until exit so the file writer flushes.
    let _log_guard = init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Run(args) => handle_run(args, config),
        Commands::Sweep(args) => handle_sweep(args, config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// An event-driven backtester: replays observations through a strategy,
/// a simulated exchange and a portfolio, and reports risk statistics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the run configuration (TOML).
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single backtest and print its performance report.
    Run(RunArgs),
    /// Run every combination of a parameter sweep in parallel.
    Sweep(SweepArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Observation CSV: timestamp,symbol,close[,open,high,low,volume].
    #[arg(long)]
    data: PathBuf,

    /// Print the full performance report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SweepArgs {
    /// Observation CSV: timestamp,symbol,close[,open,high,low,volume].
    #[arg(long)]
    data: PathBuf,

    /// Sweep definition (TOML) with commission_rate, order_fraction and seed ranges.
    #[arg(long)]
    sweep: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_run(args: RunArgs, config: Config) -> anyhow::Result<()> {
    let observations = loader::load_observations(&args.data)?;
    let feed = HistoricFeed::new(observations)?;

    let mut backtester = Backtester::from_config(&config, feed)?.with_progress(!args.json);
    let summary = backtester.run()?;

    for failure in &summary.failed_orders {
        tracing::warn!(
            symbol = %failure.signal.event.symbol,
            timestamp = %failure.signal.event.timestamp,
            error = %failure.reason,
            "Order failed during run"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary.report)?);
    } else {
        println!("{}", display::run_table(&summary));
    }
    Ok(())
}

fn handle_sweep(args: SweepArgs, config: Config) -> anyhow::Result<()> {
    let sweep = load_sweep_config(&args.sweep)
        .with_context(|| format!("failed to load sweep definition from {}", args.sweep.display()))?;
    let observations = loader::load_observations(&args.data)?;

    let results = Optimizer::new(sweep, config, observations).with_progress(true).run()?;
    println!("{}", display::sweep_table(&results));
    Ok(())
}
