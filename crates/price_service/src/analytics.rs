//! Read-only analytics views over the service state
//!
//! Nothing here mutates the cache, metrics or history.

use crate::metrics::MetricsSnapshot;
use crate::service::PredictionService;
use crate::types::{HistoryEntry, ServiceStatus, API_VERSION};
use amazeworth_price_core::{FeatureImportance, ModelPerformance, ModelStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// History entries included in the analytics report
const ANALYTICS_HISTORY: usize = 20;
/// Error count at which real-time health turns to "warning"
const ERROR_WARNING_THRESHOLD: u64 = 5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub cache_size: usize,
    pub model_loaded: bool,
    pub uptime_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub performance_metrics: MetricsSnapshot,
    pub prediction_history: Vec<HistoryEntry>,
    pub model_stats: ModelStats,
    pub feature_importance: Vec<FeatureImportance>,
    pub performance_comparison: Vec<ModelPerformance>,
    pub system_info: SystemInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachePerformance {
    pub size: usize,
    /// Percentage, rounded to 2 places
    pub hit_rate: f64,
    /// "High" below one second average latency, else "Medium"
    pub efficiency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    /// "optimal" or "warning"
    pub status: String,
    /// Seconds since the metrics window started
    pub uptime_seconds: i64,
    pub predictions_per_minute: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealTimeMetrics {
    pub current_metrics: MetricsSnapshot,
    pub cache_performance: CachePerformance,
    pub system_health: SystemHealth,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub predictions: Vec<HistoryEntry>,
    /// Entries currently held, not just those returned
    pub total_count: usize,
    pub avg_price: f64,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub version: String,
    pub smape_score: f64,
    pub accuracy: f64,
    pub features: Vec<String>,
    pub cache_enabled: bool,
    pub current_status: ServiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheInfo {
    pub size: usize,
    pub hit_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub model_stats: ModelStats,
    pub feature_importance: Vec<FeatureImportance>,
    pub performance_comparison: Vec<ModelPerformance>,
    pub recent_predictions: Vec<HistoryEntry>,
    pub system_metrics: MetricsSnapshot,
    pub cache_info: CacheInfo,
}

impl PredictionService {
    pub fn analytics(&self) -> AnalyticsReport {
        let predictor = self.predictor();
        AnalyticsReport {
            performance_metrics: self.metrics_snapshot(),
            prediction_history: self.history(ANALYTICS_HISTORY),
            model_stats: predictor.model_stats(),
            feature_importance: predictor.feature_importance(),
            performance_comparison: predictor.performance_comparison(),
            system_info: SystemInfo {
                cache_size: self.cache_len(),
                model_loaded: predictor.is_model_loaded(),
                uptime_seconds: self.uptime_seconds(),
            },
        }
    }

    pub fn real_time_metrics(&self) -> RealTimeMetrics {
        let metrics = self.metrics_snapshot();
        let now = self.clock().now();
        let window_seconds = (now - metrics.window_start).num_seconds().max(0);
        let minutes = (window_seconds as f64 / 60.0).max(1.0);

        RealTimeMetrics {
            cache_performance: CachePerformance {
                size: self.cache_len(),
                hit_rate: metrics.cache_hit_rate(),
                efficiency: if metrics.avg_response_time < 1.0 {
                    "High"
                } else {
                    "Medium"
                }
                .to_string(),
            },
            system_health: SystemHealth {
                status: if metrics.error_count < ERROR_WARNING_THRESHOLD {
                    "optimal"
                } else {
                    "warning"
                }
                .to_string(),
                uptime_seconds: window_seconds,
                predictions_per_minute: round2(metrics.total_predictions as f64 / minutes),
            },
            current_metrics: metrics,
            timestamp: now,
        }
    }

    /// The last `limit` history entries with their average price and confidence.
    pub fn history_summary(&self, limit: usize) -> HistorySummary {
        let predictions = self.history(limit);
        let (avg_price, avg_confidence) = if predictions.is_empty() {
            (0.0, 0.0)
        } else {
            let n = predictions.len() as f64;
            (
                round2(predictions.iter().map(|p| p.price).sum::<f64>() / n),
                round2(predictions.iter().map(|p| p.confidence).sum::<f64>() / n),
            )
        };

        HistorySummary {
            total_count: self.history_len(),
            predictions,
            avg_price,
            avg_confidence,
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        let stats = self.predictor().model_stats();
        ModelInfo {
            model_type: format!("{} + Advanced Heuristics", stats.model_type),
            version: API_VERSION.to_string(),
            smape_score: stats.smape_score,
            accuracy: stats.accuracy,
            features: [
                "Text Analysis",
                "Brand Recognition",
                "Quality Detection",
                "Cache Optimization",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            cache_enabled: true,
            current_status: self.status(),
        }
    }

    pub fn dashboard(&self) -> Dashboard {
        let predictor = self.predictor();
        let metrics = self.metrics_snapshot();
        Dashboard {
            model_stats: predictor.model_stats(),
            feature_importance: predictor.feature_importance(),
            performance_comparison: predictor.performance_comparison(),
            recent_predictions: self.history(ANALYTICS_HISTORY),
            cache_info: CacheInfo {
                size: self.cache_len(),
                hit_rate: metrics.cache_hit_rate(),
            },
            system_metrics: metrics,
        }
    }
}
