//! Price service type definitions

use amazeworth_price_core::{ArtifactFiles, ArtifactPresence, PredictionMethod};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service name reported by status and health endpoints
pub const SERVICE_NAME: &str = "AmazeWorth Smart Price Engine";

/// Public API version
pub const API_VERSION: &str = "2.1.0";

/// Price service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceServiceConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Directory holding the model artifacts
    pub model_dir: PathBuf,
    /// Artifact file names inside `model_dir`
    pub artifact_files: ArtifactFiles,
    /// Maximum cached results; 0 disables caching
    pub cache_capacity: usize,
    /// Maximum history entries; 0 disables history
    pub history_capacity: usize,
}

impl Default for PriceServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            log_level: "info".to_string(),
            model_dir: PathBuf::from("models"),
            artifact_files: ArtifactFiles::default(),
            cache_capacity: 100,
            history_capacity: 50,
        }
    }
}

/// Outcome of one prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Price in `[50, 150000]`
    pub price: f64,
    /// Confidence in `[0, 0.95]`
    pub confidence: f64,
    /// Up to five ordered explanation strings
    pub key_features: Vec<String>,
    pub method: PredictionMethod,
    /// Wall time of the predictor call that produced this result
    pub response_time_seconds: f64,
    pub created_at: DateTime<Utc>,
    /// Set on results served from the cache
    pub from_cache: bool,
}

/// Truncated record of a past prediction, for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub title_excerpt: String,
    pub price: f64,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

/// `POST /predict` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `POST /predict` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
    pub confidence: f64,
    pub key_features: Vec<String>,
    pub prediction_method: String,
    pub response_time: f64,
}

impl From<&PredictionResult> for PredictResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            predicted_price: result.price,
            confidence: result.confidence,
            key_features: result.key_features.clone(),
            prediction_method: result.method.label().to_string(),
            response_time: result.response_time_seconds,
        }
    }
}

/// Service status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub model_loaded: bool,
    pub service_status: String,
    /// "ML Model" or "Advanced Heuristics"
    pub prediction_method: String,
    pub cache_size: usize,
    pub trained_models: ArtifactPresence,
    pub model_hash: Option<String>,
    /// Set when the predictor runs heuristic-only
    pub unavailable_reason: Option<String>,
}
