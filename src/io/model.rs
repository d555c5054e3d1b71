//! Read/write fitted AR model JSON files.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::autoregressive::ArModel;

/// A saved model file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub strategy: String,
    pub saved_at: DateTime<Utc>,
    pub model: ArModel,
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, strategy: &str, model: &ArModel) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;

    let saved = ModelFile {
        tool: "pwf".to_string(),
        strategy: strategy.to_string(),
        saved_at: Utc::now(),
        model: model.clone(),
    };

    serde_json::to_writer_pretty(file, &saved)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;

    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))
}
