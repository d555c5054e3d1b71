//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - daily observations and weekly blocks (`Observation`, `Series`, `Block`)
//! - evaluation outputs (`Forecast`, `ScoreReport`, `ScoresFile`)
//! - run configuration (`WindowConfig`, `StrategyKind`, `EvalConfig`)

pub mod types;

pub use types::*;
