//! Bullscan CLI: alignment screen and setback backtest scan.
//!
//! Commands:
//! - `scan`: scan every offset for each setback variant and report sums and means
//! - `screen`: list symbols whose latest closes are in bullish alignment

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bullscan_core::pattern::PatternVariant;
use bullscan_core::scan::screen_universe;
use bullscan_runner::reporting::{print_summary, write_report_dir, write_summary_log, write_verbose_log};
use bullscan_runner::{load_data, run_scan, ConsoleProgress, LoadedData, RunConfig};

#[derive(Parser)]
#[command(
    name = "bullscan",
    about = "Bullscan: moving-average alignment screener and setback backtest scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by both commands.
#[derive(clap::Args)]
struct DataArgs {
    /// Directory holding one `<code>.json` history per symbol (searched recursively).
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Universe snapshot file. Defaults to `<today>.json`.
    #[arg(long)]
    universe: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan offsets for setback patterns and aggregate day-0 returns.
    Scan {
        #[command(flatten)]
        data: DataArgs,

        /// Oldest offset to scan (days back from the latest record).
        #[arg(long)]
        max_offset: Option<usize>,

        /// Newest offset to scan.
        #[arg(long)]
        min_offset: Option<usize>,

        /// Days held out past the pattern: 0 reads the pattern as of today, 1 measures the next day.
        #[arg(long)]
        holdout: Option<usize>,

        /// Restrict to one variant: three_day_setback or two_day_setback. Repeatable.
        #[arg(long = "variant")]
        variants: Vec<PatternVariant>,

        /// Only print sums, not every qualifying event.
        #[arg(long, default_value_t = false)]
        quiet: bool,

        /// Write summary.csv, events.csv and passes.json into this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List symbols currently in bullish alignment.
    Screen {
        #[command(flatten)]
        data: DataArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            data,
            max_offset,
            min_offset,
            holdout,
            variants,
            quiet,
            output_dir,
        } => {
            let mut config = load_config(data.config.as_deref())?;
            if let Some(v) = max_offset {
                config.scan.max_offset = v;
            }
            if let Some(v) = min_offset {
                config.scan.min_offset = v;
            }
            if let Some(v) = holdout {
                config.scan.holdout_days = v;
            }
            if !variants.is_empty() {
                config.scan.variants = variants;
            }
            run_scan_cmd(&data, &config, quiet, output_dir.as_deref())
        }
        Commands::Screen { data } => {
            let config = load_config(data.config.as_deref())?;
            run_screen_cmd(&data, &config)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(p) => RunConfig::from_file(p).with_context(|| format!("load config {}", p.display())),
        None => Ok(RunConfig::default()),
    }
}

fn universe_path(data: &DataArgs) -> PathBuf {
    data.universe.clone().unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        PathBuf::from(format!("{}.json", today.format("%Y-%m-%d")))
    })
}

fn load(data: &DataArgs) -> Result<LoadedData> {
    let path = universe_path(data);
    let loaded = load_data(&path, &data.data_dir)
        .with_context(|| format!("load universe {} with data from {}", path.display(), data.data_dir.display()))?;
    if loaded.universe.is_empty() {
        bail!(
            "none of the {} symbols in {} has a history under {}",
            loaded.report.listed,
            path.display(),
            data.data_dir.display()
        );
    }
    Ok(loaded)
}

fn run_scan_cmd(data: &DataArgs, config: &RunConfig, quiet: bool, output_dir: Option<&Path>) -> Result<()> {
    config.validate().context("invalid configuration")?;
    let loaded = load(data)?;

    let progress = ConsoleProgress { show_events: !quiet };
    let summary = run_scan(&loaded.universe, &loaded.store, &loaded.dataset_hash, config, Some(&progress))?;
    print_summary(&summary);

    if let Some(path) = &config.output.verbose_log {
        write_verbose_log(path, &summary).with_context(|| format!("write verbose log {}", path.display()))?;
        info!(path = %path.display(), "verbose log appended");
    }
    if let Some(path) = &config.output.summary_log {
        write_summary_log(path, &summary).with_context(|| format!("write summary log {}", path.display()))?;
        info!(path = %path.display(), "summary log appended");
    }
    if let Some(dir) = output_dir {
        write_report_dir(dir, &summary).with_context(|| format!("write reports to {}", dir.display()))?;
        println!("Reports saved to: {}", dir.display());
    }
    Ok(())
}

fn run_screen_cmd(data: &DataArgs, config: &RunConfig) -> Result<()> {
    let loaded = load(data)?;
    let aligned = screen_universe(&loaded.universe, &loaded.store, &config.alignment);

    println!(
        "{:<8} {:<12} {:>10} {:>10} {:>10} {:>10}",
        "code", "name", "close", "ma_short", "ma_mid", "ma_long"
    );
    for a in &aligned {
        println!(
            "{:<8} {:<12} {:>10.2} {:>10.3} {:>10.3} {:>10.3}",
            a.symbol, a.name, a.last_close, a.short_ma, a.mid_ma, a.long_ma
        );
    }
    println!("{} of {} symbols aligned", aligned.len(), loaded.universe.len());
    Ok(())
}
