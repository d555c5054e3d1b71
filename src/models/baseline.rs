//! Persistence baselines.
//!
//! These need no fitting: each repeats some already-observed stretch of the
//! target series. They are the yardstick every fitted strategy should beat.

use crate::domain::{DAYS_PER_WEEK, Forecast};
use crate::error::ForecastError;
use crate::models::strategy::{ForecastStrategy, History};

/// Weeks between a week and the same week one year earlier.
pub const WEEKS_PER_YEAR: usize = 52;

/// Repeat the last observed day for the whole week.
#[derive(Debug, Clone, Default)]
pub struct DailyPersistence;

impl ForecastStrategy for DailyPersistence {
    fn name(&self) -> &str {
        "daily"
    }

    fn forecast(&self, history: &History) -> Result<Forecast, ForecastError> {
        let last_week = history
            .blocks()
            .last()
            .ok_or(ForecastError::InsufficientHistory { needed: 1, got: 0 })?;
        let last_day = last_week.target_values(history.target())[DAYS_PER_WEEK - 1];
        Ok(Forecast::new(vec![last_day; DAYS_PER_WEEK]))
    }
}

/// Repeat the last observed week.
#[derive(Debug, Clone, Default)]
pub struct WeeklyPersistence;

impl ForecastStrategy for WeeklyPersistence {
    fn name(&self) -> &str {
        "weekly"
    }

    fn forecast(&self, history: &History) -> Result<Forecast, ForecastError> {
        let last_week = history.blocks().last().ok_or(ForecastError::InsufficientHistory {
            needed: DAYS_PER_WEEK,
            got: 0,
        })?;
        Ok(Forecast::new(last_week.target_values(history.target())))
    }
}

/// Repeat the week observed one year before the week being forecast.
#[derive(Debug, Clone, Default)]
pub struct YearAgoPersistence;

impl ForecastStrategy for YearAgoPersistence {
    fn name(&self) -> &str {
        "year-ago"
    }

    fn forecast(&self, history: &History) -> Result<Forecast, ForecastError> {
        let n = history.len();
        if n < WEEKS_PER_YEAR {
            return Err(ForecastError::InsufficientHistory {
                needed: WEEKS_PER_YEAR * DAYS_PER_WEEK,
                got: history.days(),
            });
        }
        let week = &history.blocks()[n - WEEKS_PER_YEAR];
        Ok(Forecast::new(week.target_values(history.target())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Block, Series};
    use chrono::NaiveDate;

    fn history(values: &[f64]) -> History {
        let start = NaiveDate::from_ymd_opt(2007, 1, 7).unwrap();
        let blocks = Series::univariate("load", start, values)
            .rows
            .chunks(DAYS_PER_WEEK)
            .map(|c| Block::new(c.to_vec()).unwrap())
            .collect();
        History::new(blocks, 0)
    }

    #[test]
    fn daily_repeats_last_day() {
        let values: Vec<f64> = (1..=14).map(f64::from).collect();
        let f = DailyPersistence.forecast(&history(&values)).unwrap();
        assert_eq!(f.values(), &[14.0; 7]);
    }

    #[test]
    fn weekly_repeats_last_week() {
        let values: Vec<f64> = (1..=14).map(f64::from).collect();
        let f = WeeklyPersistence.forecast(&history(&values)).unwrap();
        assert_eq!(f.values(), &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0]);
    }

    #[test]
    fn year_ago_picks_week_fifty_two_back() {
        // 53 weeks whose target equals the week index.
        let values: Vec<f64> = (0..53).flat_map(|w| [w as f64; 7]).collect();
        let f = YearAgoPersistence.forecast(&history(&values)).unwrap();
        // Forecasting week 53, one year earlier is week 1.
        assert_eq!(f.values(), &[1.0; 7]);
    }

    #[test]
    fn year_ago_needs_a_year_of_history() {
        let err = YearAgoPersistence.forecast(&history(&[1.0; 70])).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientHistory {
                needed: 364,
                got: 70
            }
        );
    }

    #[test]
    fn empty_history_is_an_error() {
        let empty = History::new(Vec::new(), 0);
        assert!(DailyPersistence.forecast(&empty).is_err());
        assert!(WeeklyPersistence.forecast(&empty).is_err());
    }
}
