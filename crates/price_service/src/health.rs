//! Health check for production monitoring

use crate::analytics::CacheInfo;
use crate::service::PredictionService;
use crate::types::{API_VERSION, SERVICE_NAME};
use amazeworth_price_core::PricePrediction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

const PROBE_TITLE: &str = "iPhone 14 Pro Max";
const PROBE_DESCRIPTION: &str = "Latest Apple smartphone with advanced features";

/// Health status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub model_loaded: bool,
    pub test_prediction: Option<PricePrediction>,
    /// Probe latency in seconds, rounded to 3 places
    pub response_time: f64,
    pub uptime_seconds: i64,
    pub cache_performance: CacheInfo,
    pub error: Option<String>,
}

impl PredictionService {
    /// Probe the predictor directly, bypassing cache and metrics.
    pub fn health_check(&self) -> HealthResponse {
        let clock = self.clock();
        let start = clock.monotonic_seconds();
        let probe = self.predictor().predict(PROBE_TITLE, PROBE_DESCRIPTION);
        let elapsed = (clock.monotonic_seconds() - start).max(0.0);

        let (status, test_prediction, error) = match probe {
            Ok(prediction) => (HealthStatus::Healthy, Some(prediction), None),
            Err(e) => {
                error!("Health probe failed: {}", e);
                (HealthStatus::Unhealthy, None, Some(e.to_string()))
            }
        };

        let metrics = self.metrics_snapshot();
        HealthResponse {
            status,
            service: SERVICE_NAME.to_string(),
            version: API_VERSION.to_string(),
            timestamp: clock.now(),
            model_loaded: self.predictor().is_model_loaded(),
            test_prediction,
            response_time: (elapsed * 1000.0).round() / 1000.0,
            uptime_seconds: self.uptime_seconds(),
            cache_performance: CacheInfo {
                size: self.cache_len(),
                hit_rate: metrics.cache_hit_rate(),
            },
            error,
        }
    }
}
