//! Rolling prediction counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Point-in-time copy of the service counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Successful non-cached predictions
    pub total_predictions: u64,
    pub cache_hits: u64,
    /// Running mean of predictor latency in seconds
    pub avg_response_time: f64,
    pub error_count: u64,
    pub window_start: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// Cache hits per prediction, as a percentage rounded to 2 places.
    pub fn cache_hit_rate(&self) -> f64 {
        let rate = self.cache_hits as f64 / self.total_predictions.max(1) as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone)]
pub struct MetricsTracker {
    snapshot: MetricsSnapshot,
}

impl MetricsTracker {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            snapshot: MetricsSnapshot {
                total_predictions: 0,
                cache_hits: 0,
                avg_response_time: 0.0,
                error_count: 0,
                window_start: now,
            },
        }
    }

    /// Count a successful prediction and fold its latency into the mean.
    pub fn record_prediction(&mut self, response_time: f64) {
        let s = &mut self.snapshot;
        s.total_predictions += 1;
        let n = s.total_predictions as f64;
        s.avg_response_time = (s.avg_response_time * (n - 1.0) + response_time) / n;
    }

    pub fn record_cache_hit(&mut self) {
        self.snapshot.cache_hits += 1;
    }

    pub fn record_error(&mut self) {
        self.snapshot.error_count += 1;
    }

    /// Zero all counters and restart the window.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.clone()
    }
}

/// Prometheus text exposition of a snapshot.
pub fn render_prometheus(snapshot: &MetricsSnapshot, cache_size: usize, model_loaded: bool) -> String {
    let series: [(&str, &str, &str, String); 7] = [
        (
            "price_service_predictions_total",
            "counter",
            "Successful non-cached predictions",
            snapshot.total_predictions.to_string(),
        ),
        (
            "price_service_cache_hits_total",
            "counter",
            "Predictions served from the cache",
            snapshot.cache_hits.to_string(),
        ),
        (
            "price_service_errors_total",
            "counter",
            "Failed prediction attempts",
            snapshot.error_count.to_string(),
        ),
        (
            "price_service_avg_response_time_seconds",
            "gauge",
            "Running mean of predictor latency",
            snapshot.avg_response_time.to_string(),
        ),
        (
            "price_service_cache_hit_rate_percent",
            "gauge",
            "Cache hits per prediction",
            snapshot.cache_hit_rate().to_string(),
        ),
        (
            "price_service_cache_entries",
            "gauge",
            "Results currently cached",
            cache_size.to_string(),
        ),
        (
            "price_service_model_loaded",
            "gauge",
            "Whether the trained model is in use (1=yes)",
            u8::from(model_loaded).to_string(),
        ),
    ];

    let mut output = String::new();
    for (name, kind, help, value) in series {
        // Writing to a String cannot fail.
        let _ = writeln!(output, "# HELP {name} {help}");
        let _ = writeln!(output, "# TYPE {name} {kind}");
        let _ = writeln!(output, "{name} {value}");
    }
    output
}
