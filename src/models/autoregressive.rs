//! Autoregressive AR(p) strategy.
//!
//! Each call refits the model on the flattened target history (a private copy)
//! and forecasts the next seven days recursively, feeding each prediction back
//! in as a lag for the following day.
//!
//! Fitting is ordinary least squares on a lagged design (see `math::ols`).
//! If a `ModelSink` is attached, the freshly fitted model is handed to it
//! before the forecast is returned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{DAYS_PER_WEEK, Forecast};
use crate::error::ForecastError;
use crate::math::{lagged_design, solve_least_squares};
use crate::models::store::ModelSink;
use crate::models::strategy::{ForecastStrategy, History};

/// Default lag order: one week of daily lags.
pub const DEFAULT_AR_ORDER: usize = 7;

/// Minimum number of extra regression rows beyond the coefficient count.
const MIN_ROW_BUFFER: usize = 5;

/// A fitted AR(p) model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArModel {
    pub order: usize,
    pub intercept: f64,
    /// `coefficients[k]` multiplies `y_{t-k-1}`.
    pub coefficients: Vec<f64>,
    /// Number of days the model was fitted on.
    pub n_obs: usize,
    /// In-sample one-step RMSE.
    pub rmse: f64,
}

impl ArModel {
    /// Fit on `series` by least squares.
    pub fn fit(series: &[f64], order: usize) -> Result<Self, ForecastError> {
        if order == 0 {
            return Err(ForecastError::Failed("AR order must be >= 1".to_string()));
        }
        let needed = min_days(order);
        if series.len() < needed {
            return Err(ForecastError::InsufficientHistory {
                needed,
                got: series.len(),
            });
        }

        let (x, y) = lagged_design(series, order).ok_or(ForecastError::InsufficientHistory {
            needed,
            got: series.len(),
        })?;
        let beta = solve_least_squares(&x, &y).ok_or(ForecastError::SingularFit)?;

        let fitted = &x * &beta;
        let sse: f64 = y.iter().zip(fitted.iter()).map(|(a, f)| (a - f).powi(2)).sum();
        let rmse = (sse / y.len() as f64).sqrt();

        Ok(Self {
            order,
            intercept: beta[0],
            coefficients: beta.iter().skip(1).copied().collect(),
            n_obs: series.len(),
            rmse,
        })
    }

    /// Forecast `steps` days past the end of `series`, recursively.
    pub fn forecast(&self, series: &[f64], steps: usize) -> Result<Vec<f64>, ForecastError> {
        if series.len() < self.order {
            return Err(ForecastError::InsufficientHistory {
                needed: self.order,
                got: series.len(),
            });
        }

        let mut window: Vec<f64> = series[series.len() - self.order..].to_vec();
        let mut out = Vec::with_capacity(steps);
        for _ in 0..steps {
            let next = self.intercept
                + self
                    .coefficients
                    .iter()
                    .zip(window.iter().rev())
                    .map(|(phi, y)| phi * y)
                    .sum::<f64>();
            if !next.is_finite() {
                return Err(ForecastError::Failed("non-finite AR forecast".to_string()));
            }
            out.push(next);
            window.remove(0);
            window.push(next);
        }
        Ok(out)
    }
}

/// Smallest series length an AR(`order`) fit accepts.
pub fn min_days(order: usize) -> usize {
    // `order` leading days have no full lag set; the remaining rows must
    // outnumber the coefficients (order + intercept) by MIN_ROW_BUFFER.
    2 * order + 1 + MIN_ROW_BUFFER
}

/// Strategy wrapper: refit an AR(p) on every call.
#[derive(Clone)]
pub struct ArStrategy {
    name: String,
    order: usize,
    sink: Option<Arc<dyn ModelSink>>,
}

impl ArStrategy {
    pub fn new(order: usize) -> Self {
        Self {
            name: "ar".to_string(),
            order,
            sink: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Hand every fitted model to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ModelSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

impl Default for ArStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_AR_ORDER)
    }
}

impl std::fmt::Debug for ArStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArStrategy")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl ForecastStrategy for ArStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn forecast(&self, history: &History) -> Result<Forecast, ForecastError> {
        let series = history.target_series();
        let model = ArModel::fit(&series, self.order)?;
        if let Some(sink) = &self.sink {
            sink.persist(&self.name, &model)?;
        }
        Ok(Forecast::new(model.forecast(&series, DAYS_PER_WEEK)?))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Block, Series};

    fn ar2_series(n: usize) -> Vec<f64> {
        // y_t = 5 + 0.5 y_{t-1} - 0.2 y_{t-2}, no noise.
        let mut y = vec![12.0, 3.0];
        while y.len() < n {
            let t = y.len();
            y.push(5.0 + 0.5 * y[t - 1] - 0.2 * y[t - 2]);
        }
        y
    }

    fn history(values: &[f64]) -> History {
        let start = NaiveDate::from_ymd_opt(2007, 1, 7).unwrap();
        let blocks = Series::univariate("load", start, values)
            .rows
            .chunks(DAYS_PER_WEEK)
            .map(|c| Block::new(c.to_vec()).unwrap())
            .collect();
        History::new(blocks, 0)
    }

    #[derive(Default)]
    struct RecordingSink {
        fits: Mutex<Vec<(String, usize)>>,
    }

    impl ModelSink for RecordingSink {
        fn persist(&self, name: &str, model: &ArModel) -> Result<(), ForecastError> {
            self.fits.lock().unwrap().push((name.to_string(), model.n_obs));
            Ok(())
        }
    }

    #[test]
    fn fit_recovers_noiseless_ar2() {
        let series = ar2_series(12);
        let model = ArModel::fit(&series, 2).unwrap();
        assert!((model.intercept - 5.0).abs() < 1e-6);
        assert!((model.coefficients[0] - 0.5).abs() < 1e-6);
        assert!((model.coefficients[1] + 0.2).abs() < 1e-6);
        assert!(model.rmse < 1e-6);
    }

    #[test]
    fn zero_order_is_refused() {
        let err = ArModel::fit(&ar2_series(28), 0).unwrap_err();
        assert_eq!(err, ForecastError::Failed("AR order must be >= 1".to_string()));
    }

    #[test]
    fn forecast_feeds_predictions_back() {
        let model = ArModel {
            order: 1,
            intercept: 1.0,
            coefficients: vec![2.0],
            n_obs: 0,
            rmse: 0.0,
        };
        let out = model.forecast(&[0.0, 1.0], 3).unwrap();
        assert_eq!(out, vec![3.0, 7.0, 15.0]);
    }

    #[test]
    fn strategy_forecasts_a_full_week() {
        let series = ar2_series(28);
        let f = ArStrategy::new(2).forecast(&history(&series)).unwrap();
        assert_eq!(f.len(), DAYS_PER_WEEK);
        assert!(f.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn short_history_is_reported() {
        let err = ArStrategy::new(7).forecast(&history(&[1.0; 14])).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InsufficientHistory {
                needed: min_days(7),
                got: 14
            }
        );
    }

    #[test]
    fn sink_receives_each_fit() {
        let sink = Arc::new(RecordingSink::default());
        let strategy = ArStrategy::new(2).with_name("ar2").with_sink(sink.clone());

        let series = ar2_series(21);
        strategy.forecast(&history(&series)).unwrap();

        let fits = sink.fits.lock().unwrap();
        assert_eq!(fits.as_slice(), &[("ar2".to_string(), 21)]);
    }
}
