//! Export scores and per-day predictions to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::{Block, ScoresFile};
use crate::error::AppError;
use crate::eval::Evaluation;
use crate::eval::window::check_target;

/// Write one row per strategy: overall RMSE followed by the per-step RMSEs.
pub fn write_scores_csv(path: &Path, scores: &ScoresFile) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create scores CSV '{}': {e}", path.display())))?;

    let mut header = vec!["strategy".to_string(), "rmse".to_string()];
    header.extend(scores.step_labels.iter().map(|l| format!("rmse_{l}")));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write scores CSV header: {e}")))?;

    for s in &scores.strategies {
        let mut record = vec![s.name.clone(), format!("{:.6}", s.report.overall)];
        record.extend(s.report.per_step.iter().map(|v| format!("{v:.6}")));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write scores CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush scores CSV: {e}")))?;
    Ok(())
}

/// Write one row per (strategy, test day) with the actual and predicted target.
pub fn write_predictions_csv(
    path: &Path,
    evaluations: &[&Evaluation],
    test: &[Block],
    target: usize,
) -> Result<(), AppError> {
    check_target(test.iter().flat_map(Block::rows), target)?;

    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(2, format!("Failed to create predictions CSV '{}': {e}", path.display()))
    })?;

    writer
        .write_record(["strategy", "week", "step", "date", "actual", "predicted", "error"])
        .map_err(|e| AppError::new(2, format!("Failed to write predictions CSV header: {e}")))?;

    for eval in evaluations {
        for (week, (block, forecast)) in test.iter().zip(&eval.predictions).enumerate() {
            for (step, (row, &predicted)) in block.rows().iter().zip(forecast.values()).enumerate() {
                let actual = row.values[target];
                writer
                    .write_record([
                        eval.strategy.clone(),
                        week.to_string(),
                        step.to_string(),
                        row.date.to_string(),
                        format!("{actual:.6}"),
                        format!("{predicted:.6}"),
                        format!("{:.6}", actual - predicted),
                    ])
                    .map_err(|e| AppError::new(2, format!("Failed to write predictions CSV row: {e}")))?;
            }
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush predictions CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Forecast, ScoreReport, Series, StrategyScores};
    use chrono::NaiveDate;

    #[test]
    fn scores_csv_has_one_column_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let scores = ScoresFile {
            tool: "pwf".to_string(),
            target: "load".to_string(),
            train_weeks: 2,
            test_weeks: 2,
            step_labels: ["sun", "mon", "tue", "wed", "thu", "fri", "sat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strategies: vec![StrategyScores {
                name: "weekly".to_string(),
                report: ScoreReport {
                    overall: 1.5,
                    per_step: vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0],
                },
            }],
        };

        write_scores_csv(&path, &scores).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "strategy,rmse,rmse_sun,rmse_mon,rmse_tue,rmse_wed,rmse_thu,rmse_fri,rmse_sat"
        );
        assert!(lines.next().unwrap().starts_with("weekly,1.500000,1.000000,2.000000"));
    }

    #[test]
    fn predictions_csv_lists_every_test_day() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");

        let start = NaiveDate::from_ymd_opt(2007, 1, 7).unwrap();
        let series = Series::univariate("load", start, &[4.0; 7]);
        let test = vec![Block::new(series.rows).unwrap()];
        let eval = Evaluation {
            strategy: "flat".to_string(),
            report: ScoreReport {
                overall: 1.0,
                per_step: vec![1.0; 7],
            },
            predictions: vec![Forecast::new(vec![3.0; 7])],
            history_weeks: 2,
        };

        write_predictions_csv(&path, &[&eval], &test, 0).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "flat,0,0,2007-01-07,4.000000,3.000000,1.000000");
        assert_eq!(lines[7], "flat,0,6,2007-01-13,4.000000,3.000000,1.000000");
    }

    #[test]
    fn predictions_for_missing_target_field_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");

        let start = NaiveDate::from_ymd_opt(2007, 1, 7).unwrap();
        let series = Series::univariate("load", start, &[4.0; 7]);
        let test = vec![Block::new(series.rows).unwrap()];

        let err = write_predictions_csv(&path, &[], &test, 3).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(!path.exists());
    }
}
