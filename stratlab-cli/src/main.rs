//! StratLab CLI: component listing, introspection and signal generation.
//!
//! Commands:
//! - `components` lists the registered keys of one component kind
//! - `describe` prints a component's constructor descriptors as JSON
//! - `signals` assembles strategy configs against CSV bar data and prints
//!   the bars where each strategy enters and exits

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use stratlab_core::components::indicator::default_registry as default_indicators;
use stratlab_core::components::rule::default_registry as default_rules;
use stratlab_core::data::CsvBarSeriesLoader;
use stratlab_core::domain::{TradingRecord, TradingRecordHandle};
use stratlab_core::registry::ComponentInfo;
use stratlab_core::{
    load_strategy_config, AssembledStrategy, EvaluationScope, IndicatorRegistry, RuleRegistry,
    StrategyAssembler,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stratlab",
    about = "StratLab CLI: build technical-analysis strategies from config files"
)]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered keys of a component kind.
    Components {
        #[arg(value_enum)]
        kind: Kind,
    },
    /// Print the constructor descriptors of one component as JSON.
    Describe {
        #[arg(value_enum)]
        kind: Kind,

        /// Component key (e.g., sma-indicator, and-rule).
        key: String,
    },
    /// Assemble strategy configs and print their entry/exit bars.
    Signals {
        /// Directory holding `<instrument>_<interval>.csv` files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Name the trading record is seeded under in each scope.
        #[arg(long, default_value = "record")]
        record: String,

        /// Strategy config files (.json or .toml).
        #[arg(required = true)]
        configs: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Indicator,
    Rule,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let indicators = default_indicators()?;
    let rules = default_rules()?;

    match cli.command {
        Commands::Components { kind } => {
            for key in component_keys(&indicators, &rules, kind) {
                println!("{key}");
            }
            Ok(())
        }
        Commands::Describe { kind, key } => {
            let info = describe(&indicators, &rules, kind, &key)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Commands::Signals {
            data_dir,
            record,
            configs,
        } => run_signals(&indicators, &rules, &data_dir, &record, &configs),
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn component_keys(indicators: &IndicatorRegistry, rules: &RuleRegistry, kind: Kind) -> Vec<String> {
    match kind {
        Kind::Indicator => indicators.keys().map(str::to_string).collect(),
        Kind::Rule => rules.keys().map(str::to_string).collect(),
    }
}

fn describe(
    indicators: &IndicatorRegistry,
    rules: &RuleRegistry,
    kind: Kind,
    key: &str,
) -> Result<ComponentInfo> {
    let info = match kind {
        Kind::Indicator => indicators.info_for(key)?,
        Kind::Rule => rules.info_for(key)?,
    };
    Ok(info)
}

// ── Signals ──────────────────────────────────────────────────────────

/// Bars where a strategy entered and exited while walking its series.
#[derive(Debug, PartialEq, Serialize)]
struct Signals {
    strategy: String,
    direction: String,
    entries: Vec<usize>,
    exits: Vec<usize>,
}

fn run_signals(
    indicators: &IndicatorRegistry,
    rules: &RuleRegistry,
    data_dir: &Path,
    record: &str,
    configs: &[PathBuf],
) -> Result<()> {
    let loader = CsvBarSeriesLoader::new(data_dir);
    let assembler = StrategyAssembler::new(indicators, rules, &loader);

    let results: Vec<(&PathBuf, Result<Signals>)> = configs
        .par_iter()
        .map(|path| (path, signals_for(&assembler, path, record)))
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(signals) => println!("{}", serde_json::to_string(&signals)?),
            Err(e) => {
                eprintln!("Error for {}: {e:#}", path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} strategies failed", configs.len());
    }
    Ok(())
}

/// Assemble one config in its own scope and walk its trading series.
fn signals_for(assembler: &StrategyAssembler<'_>, path: &Path, record: &str) -> Result<Signals> {
    let config = load_strategy_config(path)?;
    let handle = TradingRecord::shared(config.direction);

    let mut scope = EvaluationScope::new();
    scope.trading_records.put(record, handle.clone());

    let strategy = assembler
        .assemble(&config, &mut scope)
        .with_context(|| format!("assembling '{}'", config.strategy_name))?;
    walk(&strategy, &handle)
}

/// Enter when flat and entry fires; exit when open and exit fires.
fn walk(strategy: &AssembledStrategy, record: &TradingRecordHandle) -> Result<Signals> {
    let Some(series) = strategy.series() else {
        bail!(
            "strategy '{}' has no trading_series to walk",
            strategy.name()
        );
    };

    let mut entries = Vec::new();
    let mut exits = Vec::new();
    for (index, bar) in series.bars().iter().enumerate() {
        let is_open = record.read().is_open();
        if !is_open && strategy.should_enter(index) {
            record.write().enter(index, bar.close);
            entries.push(index);
        } else if is_open && strategy.should_exit(index) {
            record.write().exit(index, bar.close);
            exits.push(index);
        }
    }

    info!(
        strategy = strategy.name(),
        entries = entries.len(),
        exits = exits.len(),
        "walked series"
    );

    Ok(Signals {
        strategy: strategy.name().to_string(),
        direction: strategy.direction().to_string(),
        entries,
        exits,
    })
}
