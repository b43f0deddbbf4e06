//! Error types for the price prediction core

use thiserror::Error;

/// Errors that can occur in the prediction core
#[derive(Error, Debug)]
pub enum PriceCoreError {
    /// Model artifacts missing or incomplete at startup
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Constructed feature vector width disagrees with the regressor
    #[error("Feature dimension mismatch: got {actual}, expected {expected}")]
    FeatureDimensionMismatch { expected: usize, actual: usize },

    /// Both the model path and the heuristic path failed
    #[error("Prediction failed: {0}")]
    PredictionFailure(String),

    /// An artifact file was read but is not structurally valid
    #[error("Invalid artifact {name}: {reason}")]
    InvalidArtifact { name: String, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, PriceCoreError>;

/// Why the model path could not price a single request.
///
/// Never surfaced to callers: the predictor logs it and answers with the
/// heuristic instead.
#[derive(Error, Debug)]
pub enum ModelPathError {
    #[error("Feature dimension mismatch: got {actual}, expected {expected}")]
    FeatureDimensionMismatch { expected: usize, actual: usize },

    #[error("Regressor failed: {0}")]
    Regressor(#[from] crate::gbdt::ModelError),

    #[error("Non-finite price from log-price {0}")]
    NonFinite(f64),
}
