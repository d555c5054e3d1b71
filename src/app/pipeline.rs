//! Shared "evaluation pipeline" logic used by the `eval` and `rank` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (CSV or synthetic) -> split -> build strategies -> walk-forward runs
//!
//! The command handlers can then focus on presentation (printing and exports).

use std::sync::Arc;

use tracing::{info, warn};

use crate::data::generate_series;
use crate::domain::{Block, EvalConfig, InputSource, ScoresFile, Series, StrategyKind};
use crate::error::{AppError, EvalError};
use crate::eval::{Evaluation, StrategyOutcome, run_all, split};
use crate::io::ingest::load_series;
use crate::io::scores::build_scores_file;
use crate::models::{
    ArStrategy, DailyPersistence, JsonModelSink, ModelSink, StrategyRegistry, WeeklyPersistence,
    YearAgoPersistence,
};

/// All computed outputs of a single `pwf eval` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Human-readable description of the input.
    pub source: String,
    pub series: Series,
    pub train: Vec<Block>,
    pub test: Vec<Block>,
    /// One entry per strategy, in registration order.
    pub outcomes: Vec<StrategyOutcome>,
}

impl RunOutput {
    /// Evaluations of the strategies that completed.
    pub fn evaluations(&self) -> Vec<&Evaluation> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .collect()
    }

    /// Strategies that aborted, with their error.
    pub fn failures(&self) -> Vec<(&str, &EvalError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
            .collect()
    }

    pub fn scores_file(&self) -> ScoresFile {
        build_scores_file(
            self.series.target_name(),
            &self.train,
            &self.test,
            &self.evaluations(),
        )
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_eval(config: &EvalConfig) -> Result<RunOutput, AppError> {
    // 1) Load or generate the daily series.
    let (source, series) = load_input(&config.input)?;

    run_eval_with_series(config, source, series)
}

/// Execute the pipeline on an already loaded series.
pub fn run_eval_with_series(
    config: &EvalConfig,
    source: String,
    series: Series,
) -> Result<RunOutput, AppError> {
    // 2) Cut weekly train/test blocks.
    let (train, test) = split(&series, &config.window)?;
    info!(train_weeks = train.len(), test_weeks = test.len(), "split series");

    // 3) Build the strategies.
    let registry = build_registry(config)?;

    // 4) Walk forward, one parallel run per strategy.
    let outcomes = run_all(&registry, &train, &test, series.target);
    for outcome in &outcomes {
        if let Err(err) = &outcome.result {
            warn!(strategy = %outcome.name, error = %err, "strategy aborted");
        }
    }

    Ok(RunOutput {
        source,
        series,
        train,
        test,
        outcomes,
    })
}

/// Load the configured input.
///
/// Returns a short description of the source alongside the series.
pub fn load_input(input: &InputSource) -> Result<(String, Series), AppError> {
    match input {
        InputSource::Csv { path, target } => {
            let ingested = load_series(path, target.as_deref())?;
            Ok((path.display().to_string(), ingested.series))
        }
        InputSource::Synthetic { weeks, seed } => {
            let series = generate_series(*weeks, *seed)?;
            info!(weeks, seed, "generated synthetic series");
            Ok((format!("synthetic (weeks={weeks}, seed={seed})"), series))
        }
    }
}

/// Register the selected strategies in first-seen order.
pub fn build_registry(config: &EvalConfig) -> Result<StrategyRegistry, AppError> {
    if config.ar_order == 0 {
        return Err(AppError::new(2, "AR order must be >= 1."));
    }

    let sink: Option<Arc<dyn ModelSink>> = match &config.model_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::new(2, format!("Failed to create model dir '{}': {e}", dir.display()))
            })?;
            let sink: Arc<dyn ModelSink> = Arc::new(JsonModelSink::new(dir.clone()));
            Some(sink)
        }
        None => None,
    };

    let mut registry = StrategyRegistry::new();
    for kind in StrategyKind::expand(&config.strategies) {
        match kind {
            StrategyKind::Daily => registry.register(Box::new(DailyPersistence))?,
            StrategyKind::Weekly => registry.register(Box::new(WeeklyPersistence))?,
            StrategyKind::YearAgo => registry.register(Box::new(YearAgoPersistence))?,
            StrategyKind::Ar => {
                let mut ar = ArStrategy::new(config.ar_order).with_name(kind.name());
                if let Some(sink) = &sink {
                    ar = ar.with_sink(Arc::clone(sink));
                }
                registry.register(Box::new(ar))?
            }
            // `expand` never yields `All`.
            StrategyKind::All => {}
        }
    }

    if registry.is_empty() {
        return Err(AppError::new(2, "No strategies selected."));
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WindowConfig;
    use crate::error::ForecastError;
    use crate::io::model::read_model_json;

    fn config(weeks: usize, strategies: Vec<StrategyKind>) -> EvalConfig {
        EvalConfig {
            input: InputSource::Synthetic { weeks, seed: 11 },
            window: WindowConfig::default(),
            strategies,
            ar_order: 7,
            model_dir: None,
            plot: false,
            plot_width: 71,
            plot_height: 20,
            export_scores: None,
            export_predictions: None,
            export_json: None,
        }
    }

    #[test]
    fn synthetic_run_scores_every_strategy() {
        let run = run_eval(&config(120, vec![StrategyKind::All])).unwrap();
        assert_eq!(run.train.len(), 73);
        assert_eq!(run.test.len(), 46);
        assert!(run.failures().is_empty());

        let scores = run.scores_file();
        let names: Vec<&str> = scores.strategies.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["daily", "weekly", "year-ago", "ar"]);
        assert_eq!(scores.step_labels[0], "sun");
        for s in &scores.strategies {
            assert_eq!(s.report.per_step.len(), 7);
            assert!(s.report.overall.is_finite() && s.report.overall > 0.0);
        }
    }

    #[test]
    fn one_failing_strategy_does_not_hide_the_others() {
        // 60 weeks leaves 13 training weeks, too few for the year-ago baseline.
        let run = run_eval(&config(60, vec![StrategyKind::Weekly, StrategyKind::YearAgo])).unwrap();

        assert_eq!(run.evaluations().len(), 1);
        let failures = run.failures();
        assert_eq!(failures.len(), 1);
        let (name, err) = failures[0];
        assert_eq!(name, "year-ago");
        assert!(matches!(
            err,
            EvalError::Strategy {
                week: 0,
                recorded: 0,
                source: ForecastError::InsufficientHistory { .. },
                ..
            }
        ));
    }

    #[test]
    fn model_dir_receives_latest_ar_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(100, vec![StrategyKind::Ar]);
        cfg.model_dir = Some(dir.path().join("models"));

        let run = run_eval(&cfg).unwrap();
        assert!(run.failures().is_empty());

        let saved = read_model_json(&dir.path().join("models").join("ar.json")).unwrap();
        assert_eq!(saved.strategy, "ar");
        assert_eq!(saved.model.order, 7);
        // Last fit sees every week but the final test week.
        assert_eq!(saved.model.n_obs, (run.train.len() + run.test.len() - 1) * 7);
    }

    #[test]
    fn too_short_series_is_a_window_error() {
        let err = run_eval(&config(40, vec![StrategyKind::Weekly])).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn zero_ar_order_is_rejected() {
        let mut cfg = config(120, vec![StrategyKind::Ar]);
        cfg.ar_order = 0;
        assert_eq!(build_registry(&cfg).unwrap_err().exit_code(), 2);
    }
}
