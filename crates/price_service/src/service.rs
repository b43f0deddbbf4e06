//! Cached, metered prediction service
//!
//! [`PredictionService`] is the only entry point the HTTP layer uses. It is
//! constructed once at startup and shared behind an `Arc`.
//!
//! Cache, metrics and history share one lock. A request takes it twice: a
//! short lookup before calling the predictor, then the commit afterwards
//! (cache store, metrics update, history append). The predictor itself
//! runs unlocked.

use crate::cache::PredictionCache;
use crate::errors::PriceServiceError;
use crate::history::HistoryLog;
use crate::metrics::{MetricsSnapshot, MetricsTracker};
use crate::types::{HistoryEntry, PredictionResult, PriceServiceConfig, ServiceStatus};
use amazeworth_price_core::{cache_key, Assessment, Predictor};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Time source for timestamps and latency measurement
pub trait Clock: Send + Sync {
    /// Wall-clock time
    fn now(&self) -> DateTime<Utc>;

    /// Monotonic seconds since an arbitrary origin
    fn monotonic_seconds(&self) -> f64;
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Produces the price, confidence and key features for a cache miss
pub trait PriceAssessor: Send + Sync {
    fn assess(&self, title: &str, description: &str) -> amazeworth_price_core::Result<Assessment>;
}

impl PriceAssessor for Predictor {
    fn assess(&self, title: &str, description: &str) -> amazeworth_price_core::Result<Assessment> {
        Predictor::assess(self, title, description)
    }
}

struct ServiceState {
    cache: PredictionCache,
    metrics: MetricsTracker,
    history: HistoryLog,
}

pub struct PredictionService {
    predictor: Arc<Predictor>,
    assessor: Arc<dyn PriceAssessor>,
    state: Mutex<ServiceState>,
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
}

impl PredictionService {
    pub fn new(predictor: Arc<Predictor>, config: &PriceServiceConfig) -> Self {
        Self::with_clock(predictor, config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(
        predictor: Arc<Predictor>,
        config: &PriceServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let assessor: Arc<dyn PriceAssessor> = predictor.clone();
        Self::with_assessor(predictor, assessor, config, clock)
    }

    /// Serve misses through `assessor`; `predictor` still backs status,
    /// health and analytics.
    pub fn with_assessor(
        predictor: Arc<Predictor>,
        assessor: Arc<dyn PriceAssessor>,
        config: &PriceServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let started_at = clock.now();
        info!(
            "Prediction service ready ({}, cache capacity {}, history capacity {})",
            predictor.mode_label(),
            config.cache_capacity,
            config.history_capacity
        );

        Self {
            predictor,
            assessor,
            state: Mutex::new(ServiceState {
                cache: PredictionCache::new(config.cache_capacity),
                metrics: MetricsTracker::new(started_at),
                history: HistoryLog::new(config.history_capacity),
            }),
            clock,
            started_at,
        }
    }

    pub fn predictor(&self) -> &Arc<Predictor> {
        &self.predictor
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Predict a price, serving repeated inputs from the cache.
    ///
    /// Cache hits only bump the hit counter. A miss that succeeds is
    /// cached, recorded in the history and folded into the latency mean; a
    /// miss that fails only bumps the error counter.
    pub fn predict(
        &self,
        title: &str,
        description: &str,
    ) -> Result<PredictionResult, PriceServiceError> {
        let key = cache_key(title, description);

        {
            let mut state = self.state.lock();
            if let Some(cached) = state.cache.get(key).cloned() {
                state.metrics.record_cache_hit();
                debug!("Cache hit for key {:016x}", key);
                return Ok(PredictionResult {
                    from_cache: true,
                    ..cached
                });
            }
        }

        let start = self.clock.monotonic_seconds();
        let outcome = self.assessor.assess(title, description);
        let elapsed = (self.clock.monotonic_seconds() - start).max(0.0);

        let mut state = self.state.lock();
        match outcome {
            Ok(assessment) => {
                let result = PredictionResult {
                    price: assessment.price,
                    confidence: assessment.confidence,
                    key_features: assessment.key_features,
                    method: assessment.method,
                    response_time_seconds: elapsed,
                    created_at: self.clock.now(),
                    from_cache: false,
                };

                state.cache.insert(key, result.clone());
                state
                    .history
                    .record(title, result.price, result.confidence, result.created_at);
                state.metrics.record_prediction(elapsed);

                debug!(
                    "Predicted {:.2} via {} in {:.4}s",
                    result.price, result.method, elapsed
                );
                Ok(result)
            }
            Err(e) => {
                state.metrics.record_error();
                error!("Prediction pipeline failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn clear_cache(&self) {
        self.state.lock().cache.clear();
        info!("Prediction cache cleared");
    }

    pub fn reset_metrics(&self) {
        let now = self.clock.now();
        self.state.lock().metrics.reset(now);
        info!("Performance metrics reset");
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.state.lock().metrics.snapshot()
    }

    /// The most recent `limit` history entries, oldest first.
    pub fn history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.state.lock().history.recent(limit)
    }

    pub fn history_len(&self) -> usize {
        self.state.lock().history.len()
    }

    pub fn cache_len(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn uptime_seconds(&self) -> i64 {
        (self.clock.now() - self.started_at).num_seconds().max(0)
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            model_loaded: self.predictor.is_model_loaded(),
            service_status: "active".to_string(),
            prediction_method: self.predictor.mode_label().to_string(),
            cache_size: self.cache_len(),
            trained_models: self.predictor.artifact_presence(),
            model_hash: self.predictor.model_hash().map(str::to_string),
            unavailable_reason: self.predictor.unavailable_reason().map(str::to_string),
        }
    }
}
