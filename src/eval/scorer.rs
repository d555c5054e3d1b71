//! Multi-horizon forecast scoring.
//!
//! For a grid of `weeks × DAYS_PER_WEEK` actual/predicted values we report:
//! - one RMSE per day offset (column-wise over weeks)
//! - one RMSE pooled over the whole grid
//!
//! The pooled score weights every observation equally. It is not the mean of
//! the per-step scores and is never derived from them.

use crate::domain::{DAYS_PER_WEEK, ScoreReport};
use crate::error::EvalError;

/// Score predicted weeks against actual weeks.
pub fn evaluate_forecasts(actual: &[Vec<f64>], predicted: &[Vec<f64>]) -> Result<ScoreReport, EvalError> {
    if actual.len() != predicted.len() {
        return Err(EvalError::ShapeMismatch(format!(
            "{} actual weeks vs {} predicted weeks",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(EvalError::ShapeMismatch("no weeks to score".to_string()));
    }
    for (week, (a, p)) in actual.iter().zip(predicted).enumerate() {
        if a.len() != DAYS_PER_WEEK || p.len() != DAYS_PER_WEEK {
            return Err(EvalError::ShapeMismatch(format!(
                "week {week}: actual has {} values, predicted has {}, expected {DAYS_PER_WEEK}",
                a.len(),
                p.len()
            )));
        }
    }

    let weeks = actual.len() as f64;

    let per_step = (0..DAYS_PER_WEEK)
        .map(|step| {
            let sse: f64 = actual
                .iter()
                .zip(predicted)
                .map(|(a, p)| (a[step] - p[step]).powi(2))
                .sum();
            (sse / weeks).sqrt()
        })
        .collect();

    let pooled_sse: f64 = actual
        .iter()
        .zip(predicted)
        .flat_map(|(a, p)| a.iter().zip(p).map(|(x, y)| (x - y).powi(2)))
        .sum();
    let overall = (pooled_sse / (weeks * DAYS_PER_WEEK as f64)).sqrt();

    Ok(ScoreReport { overall, per_step })
}
