//! Seeded synthetic daily power-consumption series.
//!
//! The shape mimics the household dataset resampled to daily totals:
//! - a yearly cycle peaking in winter
//! - a weekly cycle with heavier weekends
//! - Gaussian day-to-day noise
//!
//! The series starts on Saturday 2006-12-16 so that, with the default
//! window (drop one head row), the first training week starts on a Sunday.

use std::f64::consts::TAU;

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DAYS_PER_WEEK, Series};
use crate::error::AppError;

/// Column name used for the generated target.
pub const SYNTHETIC_TARGET: &str = "Global_active_power";

/// Weeks in the household dataset (2006-12-16 .. 2010-11-26).
pub const DEFAULT_SYNTHETIC_WEEKS: usize = 206;

const BASE_LEVEL: f64 = 1500.0;
const YEARLY_AMPLITUDE: f64 = 450.0;
const NOISE_SD: f64 = 150.0;

/// Multiplier per weekday, indexed from Monday.
const WEEKDAY_FACTOR: [f64; DAYS_PER_WEEK] = [0.92, 0.90, 0.93, 0.91, 0.95, 1.18, 1.21];

pub fn synthetic_start() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2006, 12, 16)
}

/// Generate `weeks * 7` days of synthetic load.
pub fn generate_series(weeks: usize, seed: u64) -> Result<Series, AppError> {
    if weeks == 0 {
        return Err(AppError::new(2, "Synthetic series needs at least one week."));
    }
    let start = synthetic_start().ok_or_else(|| AppError::new(4, "Invalid synthetic start date."))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, NOISE_SD)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let n = weeks * DAYS_PER_WEEK;
    let mut values = Vec::with_capacity(n);
    for i in 0..n {
        let date = start + chrono::Duration::days(i as i64);
        let level = seasonal_level(date);
        let noise: f64 = normal.sample(&mut rng);
        values.push((level + noise).max(0.0));
    }

    Ok(Series::univariate(SYNTHETIC_TARGET, start, &values))
}

/// Noise-free level for `date`.
fn seasonal_level(date: NaiveDate) -> f64 {
    // Peak in mid-January.
    let phase = (date.ordinal0() as f64 - 15.0) / 365.25;
    let yearly = BASE_LEVEL + YEARLY_AMPLITUDE * (TAU * phase).cos();
    yearly * WEEKDAY_FACTOR[date.weekday().num_days_from_monday() as usize]
}
