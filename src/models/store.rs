//! Optional model persistence.
//!
//! Persisting a fitted model is a collaborator the strategy calls explicitly,
//! never a side effect of evaluation itself. Strategies without a sink are
//! pure functions of their history.

use std::path::{Path, PathBuf};

use crate::error::ForecastError;
use crate::io::model::write_model_json;
use crate::models::autoregressive::ArModel;

/// Receives each freshly fitted model.
pub trait ModelSink: Send + Sync {
    /// `name` is the registry name of the strategy that fitted `model`.
    fn persist(&self, name: &str, model: &ArModel) -> Result<(), ForecastError>;
}

/// Writes the latest fitted model of each strategy to `<dir>/<name>.json`.
///
/// Each call overwrites the previous file, so after a run the directory holds
/// the model fitted for the final test week.
#[derive(Debug, Clone)]
pub struct JsonModelSink {
    dir: PathBuf,
}

impl JsonModelSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ModelSink for JsonModelSink {
    fn persist(&self, name: &str, model: &ArModel) -> Result<(), ForecastError> {
        write_model_json(&self.path_for(name), name, model)
            .map_err(|e| ForecastError::Persist(e.to_string()))
    }
}
