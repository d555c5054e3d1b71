//! The forecast strategy contract.
//!
//! A strategy sees the blocks observed so far through a shared `&History` and
//! returns the next week's forecast. It cannot extend or reorder the history;
//! only the walk-forward evaluator does that, after the forecast is recorded.

use crate::domain::{Block, DAYS_PER_WEEK, Forecast};
use crate::error::{EvalError, ForecastError};

/// Weekly blocks observed so far, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    blocks: Vec<Block>,
    target: usize,
}

impl History {
    pub fn new(blocks: Vec<Block>, target: usize) -> Self {
        Self { blocks, target }
    }

    /// Append the observed week. Only the evaluator calls this.
    pub(crate) fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of weeks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of days.
    pub fn days(&self) -> usize {
        self.blocks.len() * DAYS_PER_WEEK
    }

    /// Index of the target field inside each observation.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Private copy of the target field, flattened day by day.
    pub fn target_series(&self) -> Vec<f64> {
        self.blocks
            .iter()
            .flat_map(|b| b.rows().iter().map(|r| r.values[self.target]))
            .collect()
    }
}

/// Produces a 7-day forecast from the current history.
pub trait ForecastStrategy: Send + Sync {
    /// Name used in reports; unique within a registry.
    fn name(&self) -> &str;

    fn forecast(&self, history: &History) -> Result<Forecast, ForecastError>;
}

/// Adapter turning a closure into a strategy.
pub struct FnStrategy<F> {
    name: String,
    f: F,
}

impl<F> ForecastStrategy for FnStrategy<F>
where
    F: Fn(&History) -> Result<Forecast, ForecastError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn forecast(&self, history: &History) -> Result<Forecast, ForecastError> {
        (self.f)(history)
    }
}

/// Wrap a closure as a named strategy.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FnStrategy<F>
where
    F: Fn(&History) -> Result<Forecast, ForecastError> + Send + Sync,
{
    FnStrategy { name: name.into(), f }
}

/// Named strategies, kept in registration order.
#[derive(Default)]
pub struct StrategyRegistry {
    entries: Vec<Box<dyn ForecastStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Box<dyn ForecastStrategy>) -> Result<(), EvalError> {
        if self.get(strategy.name()).is_some() {
            return Err(EvalError::DuplicateStrategy(strategy.name().to_string()));
        }
        self.entries.push(strategy);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn ForecastStrategy> {
        self.entries
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.name()).collect()
    }

    pub fn strategies(&self) -> &[Box<dyn ForecastStrategy>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}
