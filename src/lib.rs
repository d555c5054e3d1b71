//! `power-walkforward` library crate.
//!
//! Walk-forward evaluation of 7-day forecasts of daily household power
//! consumption. The binary (`pwf`) is a thin wrapper around this library so that:
//!
//! - the evaluation core is testable without spawning processes
//! - strategies can be plugged in from other crates via `ForecastStrategy`

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod eval;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
