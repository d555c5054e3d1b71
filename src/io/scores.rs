//! Read/write scores JSON files.
//!
//! Scores JSON is the portable summary of an evaluation run:
//! - target column and train/test sizes
//! - the weekday label of each forecast step
//! - one `ScoreReport` per strategy that completed
//!
//! The schema is defined by `domain::ScoresFile`.

use std::fs::File;
use std::path::Path;

use chrono::Datelike;

use crate::domain::{Block, ScoresFile, StrategyScores};
use crate::error::AppError;
use crate::eval::Evaluation;

/// Assemble a scores file from completed evaluations.
pub fn build_scores_file(
    target: &str,
    train: &[Block],
    test: &[Block],
    evaluations: &[&Evaluation],
) -> ScoresFile {
    ScoresFile {
        tool: "pwf".to_string(),
        target: target.to_string(),
        train_weeks: train.len(),
        test_weeks: test.len(),
        step_labels: test.first().map(step_labels).unwrap_or_default(),
        strategies: evaluations
            .iter()
            .map(|e| StrategyScores {
                name: e.strategy.clone(),
                report: e.report.clone(),
            })
            .collect(),
    }
}

/// Lowercase weekday names for each day of `block`, e.g. `sun`, `mon`.
pub fn step_labels(block: &Block) -> Vec<String> {
    block
        .rows()
        .iter()
        .map(|r| r.date.weekday().to_string().to_lowercase())
        .collect()
}

/// Write a scores JSON file.
pub fn write_scores_json(path: &Path, scores: &ScoresFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create scores JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, scores)
        .map_err(|e| AppError::new(2, format!("Failed to write scores JSON: {e}")))?;
    Ok(())
}

/// Read a scores JSON file.
pub fn read_scores_json(path: &Path) -> Result<ScoresFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open scores JSON '{}': {e}", path.display())))?;
    let scores: ScoresFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid scores JSON: {e}")))?;
    Ok(scores)
}
