//! Walk-forward (rolling-origin) evaluation.
//!
//! For every test week, in order:
//! 1. ask the strategy for a forecast given the current history
//! 2. record the forecast
//! 3. append the real test week to the history
//!
//! The strategy predicting week `i` therefore sees `train + i` weeks, never the
//! week it is predicting. A failing call aborts the run; nothing is scored.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{Block, DAYS_PER_WEEK, Forecast, ScoreReport};
use crate::error::{EvalError, ForecastError};
use crate::eval::scorer::evaluate_forecasts;
use crate::eval::window::check_target;
use crate::models::{ForecastStrategy, History, StrategyRegistry};

/// Output of one strategy run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub strategy: String,
    pub report: ScoreReport,
    /// One forecast per test week, in test order.
    pub predictions: Vec<Forecast>,
    /// Weeks in the history once every test week has been appended.
    pub history_weeks: usize,
}

/// Result of one registered strategy inside a multi-strategy run.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub name: String,
    pub result: Result<Evaluation, EvalError>,
}

/// Evaluate a single strategy over `test`, starting from `train`.
pub fn run(
    strategy: &dyn ForecastStrategy,
    train: &[Block],
    test: &[Block],
    target: usize,
) -> Result<Evaluation, EvalError> {
    if train.is_empty() || test.is_empty() {
        return Err(EvalError::InvalidWindow(format!(
            "walk-forward needs train and test weeks (train={}, test={})",
            train.len(),
            test.len()
        )));
    }
    check_target(train.iter().chain(test).flat_map(Block::rows), target)?;

    let name = strategy.name().to_string();
    let mut history = History::new(train.to_vec(), target);
    let mut predictions = Vec::with_capacity(test.len());

    for (week, observed) in test.iter().enumerate() {
        let forecast = strategy
            .forecast(&history)
            .and_then(check_width)
            .map_err(|source| EvalError::Strategy {
                strategy: name.clone(),
                week,
                recorded: predictions.len(),
                source,
            })?;
        debug!(strategy = %name, week, history_weeks = history.len(), "forecast recorded");

        predictions.push(forecast);
        history.push(observed.clone());
    }

    let actual: Vec<Vec<f64>> = test.iter().map(|b| b.target_values(target)).collect();
    let predicted: Vec<Vec<f64>> = predictions.iter().map(|f| f.values().to_vec()).collect();
    let report = evaluate_forecasts(&actual, &predicted)?;

    info!(strategy = %name, weeks = test.len(), rmse = report.overall, "walk-forward run complete");

    Ok(Evaluation {
        strategy: name,
        report,
        predictions,
        history_weeks: history.len(),
    })
}

/// Evaluate every registered strategy.
///
/// Runs are independent (each owns its history) and execute in parallel.
/// Outcomes are returned in registration order.
pub fn run_all(
    registry: &StrategyRegistry,
    train: &[Block],
    test: &[Block],
    target: usize,
) -> Vec<StrategyOutcome> {
    registry
        .strategies()
        .par_iter()
        .map(|strategy| StrategyOutcome {
            name: strategy.name().to_string(),
            result: run(strategy.as_ref(), train, test, target),
        })
        .collect()
}

fn check_width(forecast: Forecast) -> Result<Forecast, ForecastError> {
    if forecast.len() != DAYS_PER_WEEK {
        return Err(ForecastError::WrongLength {
            expected: DAYS_PER_WEEK,
            got: forecast.len(),
        });
    }
    Ok(forecast)
}
