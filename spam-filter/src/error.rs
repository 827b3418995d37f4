//! Error types for spam-filter

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid label pair: truth '{truth}', prediction '{prediction}'")]
    InvalidLabel { truth: String, prediction: String },

    #[error("No prediction for message: {0}")]
    MissingPrediction(String),

    #[error("Ground truth file not found: {}", .0.display())]
    MissingTruthFile(PathBuf),

    #[error("Model error: {0}")]
    Model(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
