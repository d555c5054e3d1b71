//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed through the evaluation loop without conversion
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Number of daily observations in one block (one week).
pub const DAYS_PER_WEEK: usize = 7;

/// One day of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    /// Numeric fields, in `Series::columns` order.
    pub values: Vec<f64>,
}

/// An ordered daily series with one designated target field.
#[derive(Debug, Clone)]
pub struct Series {
    pub columns: Vec<String>,
    pub target: usize,
    pub rows: Vec<Observation>,
}

impl Series {
    /// Build a single-column series with consecutive daily dates.
    pub fn univariate(name: impl Into<String>, start: NaiveDate, values: &[f64]) -> Self {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation {
                date: start + Duration::days(i as i64),
                values: vec![v],
            })
            .collect();

        Self {
            columns: vec![name.into()],
            target: 0,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn target_name(&self) -> &str {
        self.columns.get(self.target).map(String::as_str).unwrap_or("")
    }

    /// The target field of every row, in order.
    pub fn target_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.values[self.target]).collect()
    }
}

/// Exactly `DAYS_PER_WEEK` consecutive observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    rows: Vec<Observation>,
}

impl Block {
    pub fn new(rows: Vec<Observation>) -> Result<Self, EvalError> {
        if rows.len() != DAYS_PER_WEEK {
            return Err(EvalError::InvalidWindow(format!(
                "a block holds {DAYS_PER_WEEK} days, got {}",
                rows.len()
            )));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn first_date(&self) -> NaiveDate {
        self.rows[0].date
    }

    /// Target field of each day in the block.
    pub fn target_values(&self, target: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.values[target]).collect()
    }
}

/// Predicted target values for the next week, one per day offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast(Vec<f64>);

impl Forecast {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for Forecast {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Scores for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// RMSE pooled over every (week, day) pair.
    pub overall: f64,
    /// RMSE per day offset (index 0 = first day of the week).
    pub per_step: Vec<f64>,
}

/// Where the train/test boundaries fall, counted in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Rows dropped from the start (e.g. a partial first day).
    pub head_offset: usize,
    /// Train ends (and test starts) this many rows before the end.
    pub train_tail_offset: usize,
    /// Test ends this many rows before the end.
    pub test_tail_offset: usize,
    /// Forecast length; must equal `DAYS_PER_WEEK`.
    pub horizon: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            head_offset: 1,
            train_tail_offset: 328,
            test_tail_offset: 6,
            horizon: DAYS_PER_WEEK,
        }
    }
}

/// Which strategies to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Every strategy below.
    All,
    /// Repeat the last observed day.
    Daily,
    /// Repeat the last observed week.
    Weekly,
    /// Repeat the same week one year (52 weeks) earlier.
    YearAgo,
    /// Autoregressive model fitted by least squares.
    Ar,
}

impl StrategyKind {
    pub const CONCRETE: [StrategyKind; 4] = [
        StrategyKind::Daily,
        StrategyKind::Weekly,
        StrategyKind::YearAgo,
        StrategyKind::Ar,
    ];

    /// Registry name used in reports and exports.
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::All => "all",
            StrategyKind::Daily => "daily",
            StrategyKind::Weekly => "weekly",
            StrategyKind::YearAgo => "year-ago",
            StrategyKind::Ar => "ar",
        }
    }

    /// Expand `All` and drop duplicates, keeping first-seen order.
    pub fn expand(kinds: &[StrategyKind]) -> Vec<StrategyKind> {
        let mut out = Vec::new();
        for &kind in kinds {
            let add: &[StrategyKind] = if kind == StrategyKind::All {
                &Self::CONCRETE
            } else {
                std::slice::from_ref(&kind)
            };
            for k in add {
                if !out.contains(k) {
                    out.push(*k);
                }
            }
        }
        out
    }
}

/// Where the daily series comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Csv { path: PathBuf, target: Option<String> },
    Synthetic { weeks: usize, seed: u64 },
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub input: InputSource,
    pub window: WindowConfig,
    pub strategies: Vec<StrategyKind>,
    pub ar_order: usize,

    /// Directory where the AR strategy persists its latest fitted model.
    pub model_dir: Option<PathBuf>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_scores: Option<PathBuf>,
    pub export_predictions: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// Scores of one strategy inside a saved scores file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyScores {
    pub name: String,
    pub report: ScoreReport,
}

/// A saved scores file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoresFile {
    pub tool: String,
    pub target: String,
    pub train_weeks: usize,
    pub test_weeks: usize,
    /// Weekday label per forecast step (e.g. `sun`, `mon`, ...).
    pub step_labels: Vec<String>,
    pub strategies: Vec<StrategyScores>,
}
