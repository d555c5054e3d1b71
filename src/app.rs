//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - loads (or generates) the daily series
//! - runs the walk-forward evaluation of every selected strategy
//! - prints scores/rankings/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, EvalArgs, PlotArgs};
use crate::domain::{EvalConfig, InputSource, WindowConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pwf` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Eval(args) => handle_eval(args, OutputMode::Full),
        Command::Rank(args) => handle_eval(args, OutputMode::RankOnly),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "power_walkforward=debug"
    } else {
        "power_walkforward=info"
    };
    // A subscriber may already be installed (e.g. by an embedding process).
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RankOnly,
}

fn handle_eval(args: EvalArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = eval_config_from_args(&args);
    let run = pipeline::run_eval(&config)?;
    let scores = run.scores_file();

    // Print terminal output.
    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_run_header(&run.source, &run.series, &run.train, &run.test)
        );
        println!("{}", crate::report::format_scores(&scores.strategies));
        println!(
            "{}",
            crate::report::format_score_table(&scores.strategies, &scores.step_labels)
        );
    }

    let rankings = crate::report::rank_strategies(&scores.strategies);
    println!(
        "{}",
        crate::report::format_rankings(&rankings, &scores.step_labels)
    );

    if mode == OutputMode::Full && config.plot && !scores.strategies.is_empty() {
        let plot = crate::plot::render_step_plot(
            &scores.strategies,
            &scores.step_labels,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports (completed strategies only).
    if let Some(path) = &config.export_scores {
        crate::io::export::write_scores_csv(path, &scores)?;
    }
    if let Some(path) = &config.export_predictions {
        crate::io::export::write_predictions_csv(
            path,
            &run.evaluations(),
            &run.test,
            run.series.target,
        )?;
    }
    if let Some(path) = &config.export_json {
        crate::io::scores::write_scores_json(path, &scores)?;
    }

    failures_to_error(&run.failures())
}

/// Aborted strategies turn the whole command into a failure, after the
/// surviving scores have been printed.
fn failures_to_error(failures: &[(&str, &crate::error::EvalError)]) -> Result<(), AppError> {
    let Some((_, first)) = failures.first() else {
        return Ok(());
    };
    let code = AppError::from((*first).clone()).exit_code();
    let message = crate::report::format_failures(failures);
    Err(AppError::new(code, message.trim_end()))
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let scores = crate::io::scores::read_scores_json(&args.scores)?;
    if scores.strategies.is_empty() {
        return Err(AppError::new(3, "Scores file holds no strategies."));
    }

    let plot = crate::plot::render_step_plot(
        &scores.strategies,
        &scores.step_labels,
        args.width,
        args.height,
    );
    println!("{}", crate::report::format_scores(&scores.strategies));
    println!("{plot}");
    Ok(())
}

pub fn eval_config_from_args(args: &EvalArgs) -> EvalConfig {
    let input = match &args.input.csv {
        Some(path) => InputSource::Csv {
            path: path.clone(),
            target: args.input.target.clone(),
        },
        None => InputSource::Synthetic {
            weeks: args.input.weeks,
            seed: args.input.seed,
        },
    };

    EvalConfig {
        input,
        window: WindowConfig {
            head_offset: args.head_offset,
            train_tail_offset: args.train_tail_offset,
            test_tail_offset: args.test_tail_offset,
            horizon: args.horizon,
        },
        strategies: args.strategies.clone(),
        ar_order: args.ar_order,
        model_dir: args.model_dir.clone(),
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_scores: args.export_scores.clone(),
        export_predictions: args.export_predictions.clone(),
        export_json: args.export_json.clone(),
    }
}
