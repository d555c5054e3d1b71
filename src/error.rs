use thiserror::Error;

/// Application-level error: a message plus the process exit code.
///
/// Exit codes:
/// - 2: bad input, configuration or IO
/// - 3: insufficient or mis-shaped data (window errors)
/// - 4: evaluation failure (strategy or scoring)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by the evaluation core (windowing, scoring, walk-forward loop).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// A train/test slice cannot be cut into whole weeks, or offsets are out of range.
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// The target field index is past the end of a row's values.
    #[error("target field {target} is out of range for a row with {width} fields")]
    InvalidTarget { target: usize, width: usize },

    /// Actual and predicted grids disagree in length or width.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A strategy call failed; the run was aborted at `week`.
    #[error("strategy `{strategy}` failed on test week {week} ({recorded} forecasts recorded): {source}")]
    Strategy {
        strategy: String,
        week: usize,
        recorded: usize,
        #[source]
        source: ForecastError,
    },

    #[error("strategy `{0}` is already registered")]
    DuplicateStrategy(String),
}

/// Errors a forecast strategy may return for a single call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("insufficient history: need at least {needed} days, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    #[error("least-squares fit is singular")]
    SingularFit,

    #[error("forecast has {got} values, expected {expected}")]
    WrongLength { expected: usize, got: usize },

    #[error("failed to persist model: {0}")]
    Persist(String),

    #[error("{0}")]
    Failed(String),
}

impl From<EvalError> for AppError {
    fn from(err: EvalError) -> Self {
        let code = match err {
            EvalError::InvalidWindow(_) | EvalError::InvalidTarget { .. } => 3,
            EvalError::DuplicateStrategy(_) => 2,
            EvalError::ShapeMismatch(_) | EvalError::Strategy { .. } => 4,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_error_names_week_and_kind() {
        let err = EvalError::Strategy {
            strategy: "ar".to_string(),
            week: 3,
            recorded: 3,
            source: ForecastError::SingularFit,
        };
        let msg = err.to_string();
        assert!(msg.contains("`ar`"));
        assert!(msg.contains("week 3"));
        assert!(msg.contains("singular"));
    }

    #[test]
    fn eval_errors_map_to_exit_codes() {
        let window: AppError = EvalError::InvalidWindow("x".into()).into();
        assert_eq!(window.exit_code(), 3);

        let target: AppError = EvalError::InvalidTarget { target: 2, width: 1 }.into();
        assert_eq!(target.exit_code(), 3);

        let shape: AppError = EvalError::ShapeMismatch("x".into()).into();
        assert_eq!(shape.exit_code(), 4);

        let dup: AppError = EvalError::DuplicateStrategy("ar".into()).into();
        assert_eq!(dup.exit_code(), 2);
    }
}
