//! Command-line parsing for the walk-forward evaluator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the evaluation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::DEFAULT_SYNTHETIC_WEEKS;
use crate::domain::StrategyKind;
use crate::models::DEFAULT_AR_ORDER;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "pwf",
    version,
    about = "Walk-forward evaluation of weekly household power forecasts"
)]
pub struct Cli {
    /// Log debug output (per-week forecasts) to stderr. `RUST_LOG` overrides.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate strategies, print per-step scores, and optionally plot/export.
    Eval(EvalArgs),
    /// Print strategies ranked by aggregate RMSE only (useful for scripting).
    Rank(EvalArgs),
    /// Plot a previously exported scores JSON.
    Plot(PlotArgs),
}

/// Common options for evaluating and ranking.
#[derive(Debug, Parser, Clone)]
pub struct EvalArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Rows dropped from the start of the series.
    #[arg(long, default_value_t = 1)]
    pub head_offset: usize,

    /// Train ends (and test starts) this many rows before the end.
    #[arg(long, default_value_t = 328)]
    pub train_tail_offset: usize,

    /// Test ends this many rows before the end.
    #[arg(long, default_value_t = 6)]
    pub test_tail_offset: usize,

    /// Forecast horizon in days (must be 7).
    #[arg(long, default_value_t = 7)]
    pub horizon: usize,

    /// Strategies to evaluate (repeatable).
    #[arg(short = 's', long = "strategy", value_enum, default_values_t = [StrategyKind::All])]
    pub strategies: Vec<StrategyKind>,

    /// Number of lags for the AR strategy.
    #[arg(long, default_value_t = DEFAULT_AR_ORDER)]
    pub ar_order: usize,

    /// Persist the latest fitted AR model to `<DIR>/<strategy>.json`.
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 71)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export per-strategy scores to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_scores: Option<PathBuf>,

    /// Export per-day predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_predictions: Option<PathBuf>,

    /// Export scores to JSON (readable by `pwf plot`).
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Where the daily series comes from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Daily CSV: date column first, numeric columns after.
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "synthetic",
        required_unless_present = "synthetic"
    )]
    pub csv: Option<PathBuf>,

    /// Use a seeded synthetic series instead of a CSV.
    #[arg(long)]
    pub synthetic: bool,

    /// Target column in the CSV (default: first numeric column).
    #[arg(long, requires = "csv")]
    pub target: Option<String>,

    /// Weeks of synthetic data.
    #[arg(long, default_value_t = DEFAULT_SYNTHETIC_WEEKS)]
    pub weeks: usize,

    /// Seed for the synthetic series.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for plotting saved scores.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Scores JSON file produced by `pwf eval --export-json`.
    #[arg(long, value_name = "JSON")]
    pub scores: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 71)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
