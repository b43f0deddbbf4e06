//! Integration tests for the prediction service

use amazeworth_price_core::{
    Assessment, PriceCoreError, Predictor, MAX_CONFIDENCE, MAX_PRICE, MIN_PRICE,
};
use amazeworth_price_service::{
    Clock, PredictionService, PriceAssessor, PriceServiceConfig, PriceServiceError, SystemClock,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Clock replaying scripted monotonic readings; wall time advances one
/// second per reading.
struct ScriptedClock {
    readings: Mutex<VecDeque<f64>>,
    ticks: Mutex<i64>,
}

impl ScriptedClock {
    /// Readings that make consecutive predictions take `latencies` seconds.
    fn with_latencies(latencies: &[f64]) -> Self {
        let readings = latencies
            .iter()
            .enumerate()
            .flat_map(|(i, latency)| {
                let start = i as f64 * 10.0;
                [start, start + latency]
            })
            .collect();
        Self {
            readings: Mutex::new(readings),
            ticks: Mutex::new(0),
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut ticks = self.ticks.lock();
        *ticks += 1;
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(*ticks)
    }

    fn monotonic_seconds(&self) -> f64 {
        self.readings.lock().pop_front().unwrap_or(0.0)
    }
}

/// Assessor that fails for titles containing "broken".
struct BrokenOnDemand(Predictor);

impl PriceAssessor for BrokenOnDemand {
    fn assess(&self, title: &str, description: &str) -> amazeworth_price_core::Result<Assessment> {
        if title.contains("broken") {
            return Err(PriceCoreError::PredictionFailure("pipeline down".to_string()));
        }
        self.0.assess(title, description)
    }
}

fn config(cache_capacity: usize, history_capacity: usize) -> PriceServiceConfig {
    PriceServiceConfig {
        cache_capacity,
        history_capacity,
        ..PriceServiceConfig::default()
    }
}

fn heuristic_service(config: &PriceServiceConfig) -> PredictionService {
    PredictionService::new(Arc::new(Predictor::heuristic_only()), config)
}

#[test]
fn test_results_are_bounded() {
    let service = heuristic_service(&PriceServiceConfig::default());
    let inputs = [
        ("", ""),
        ("Nike Shoes", ""),
        ("iPhone 14 Pro Max", "Latest Apple smartphone"),
        ("Premium professional ultra max laptop 1TB", &"word ".repeat(500)),
    ];

    for (title, description) in inputs {
        let result = service.predict(title, description).unwrap();
        assert!((MIN_PRICE..=MAX_PRICE).contains(&result.price));
        assert!((0.0..=MAX_CONFIDENCE).contains(&result.confidence));
        assert!(result.key_features.len() <= 5);
    }
}

#[test]
fn test_fresh_services_agree() {
    let a = heuristic_service(&PriceServiceConfig::default());
    let b = heuristic_service(&PriceServiceConfig::default());

    let first = a.predict("iPhone 14 Pro Max", "Latest Apple smartphone").unwrap();
    let second = b.predict("iPhone 14 Pro Max", "Latest Apple smartphone").unwrap();
    assert_eq!(first.price, second.price);
    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.key_features, second.key_features);
}

#[test]
fn test_cache_hit_semantics() {
    let service = heuristic_service(&PriceServiceConfig::default());

    let miss = service.predict("Nike Shoes", "running").unwrap();
    let hit = service.predict("Nike Shoes", "running").unwrap();
    assert!(!miss.from_cache);
    assert!(hit.from_cache);
    assert_eq!(hit.price, miss.price);

    // the stored entry keeps from_cache = false for the next consumer
    let again = service.predict("Nike Shoes", "running").unwrap();
    assert!(again.from_cache);

    let metrics = service.metrics_snapshot();
    assert_eq!(metrics.total_predictions, 1);
    assert_eq!(metrics.cache_hits, 2);
    assert_eq!(service.history_len(), 1);
}

#[test]
fn test_cache_key_separates_fields() {
    let service = heuristic_service(&PriceServiceConfig::default());
    service.predict("ab", "c").unwrap();
    let other = service.predict("a", "bc").unwrap();
    assert!(!other.from_cache);
    assert_eq!(service.cache_len(), 2);
}

#[test]
fn test_cache_evicts_oldest() {
    let service = heuristic_service(&config(3, 50));
    for title in ["one", "two", "three", "four"] {
        service.predict(title, "").unwrap();
    }
    assert_eq!(service.cache_len(), 3);

    assert!(!service.predict("one", "").unwrap().from_cache);
    assert!(service.predict("four", "").unwrap().from_cache);
}

#[test]
fn test_history_keeps_latest_fifty() {
    let service = heuristic_service(&PriceServiceConfig::default());
    for i in 0..60 {
        service.predict(&format!("item {i}"), "").unwrap();
    }

    let history = service.history(100);
    assert_eq!(history.len(), 50);
    assert_eq!(history[0].title_excerpt, "item 10");
    assert_eq!(history[49].title_excerpt, "item 59");
}

#[test]
fn test_history_truncates_long_titles() {
    let service = heuristic_service(&PriceServiceConfig::default());
    let title = "a".repeat(80);
    service.predict(&title, "").unwrap();
    assert_eq!(
        service.history(1)[0].title_excerpt,
        format!("{}...", "a".repeat(50))
    );
}

#[test]
fn test_running_average_latency() {
    let latencies = [0.1, 0.25, 0.4, 0.05];
    let clock = Arc::new(ScriptedClock::with_latencies(&latencies));
    let service = PredictionService::with_clock(
        Arc::new(Predictor::heuristic_only()),
        &PriceServiceConfig::default(),
        clock,
    );

    for (i, latency) in latencies.iter().enumerate() {
        let result = service.predict(&format!("listing {i}"), "").unwrap();
        assert!((result.response_time_seconds - latency).abs() < 1e-9);
    }
    // a cache hit reads no latency and leaves the mean alone
    assert!(service.predict("listing 0", "").unwrap().from_cache);

    let expected = latencies.iter().sum::<f64>() / latencies.len() as f64;
    let metrics = service.metrics_snapshot();
    assert_eq!(metrics.total_predictions, 4);
    assert!((metrics.avg_response_time - expected).abs() < 1e-9);
}

#[test]
fn test_reset_restarts_window() {
    let clock = Arc::new(ScriptedClock::with_latencies(&[0.5]));
    let service = PredictionService::with_clock(
        Arc::new(Predictor::heuristic_only()),
        &PriceServiceConfig::default(),
        clock,
    );
    let before = service.metrics_snapshot().window_start;
    service.predict("Nike Shoes", "").unwrap();

    service.reset_metrics();
    let metrics = service.metrics_snapshot();
    assert_eq!(metrics.total_predictions, 0);
    assert_eq!(metrics.avg_response_time, 0.0);
    assert!(metrics.window_start > before);
}

#[test]
fn test_concurrent_predictions_respect_bounds() {
    let service = Arc::new(heuristic_service(&config(16, 8)));
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let service = service.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    service.predict(&format!("item {}", i % 20), &worker.to_string()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(service.cache_len() <= 16);
    assert!(service.history_len() <= 8);
    let metrics = service.metrics_snapshot();
    assert_eq!(metrics.total_predictions + metrics.cache_hits, 200);
}

#[test]
fn test_pipeline_failure_counts_error_only() {
    let service = PredictionService::with_assessor(
        Arc::new(Predictor::heuristic_only()),
        Arc::new(BrokenOnDemand(Predictor::heuristic_only())),
        &PriceServiceConfig::default(),
        Arc::new(SystemClock::new()),
    );
    service.predict("Nike Shoes", "").unwrap();

    let err = service.predict("broken listing", "").unwrap_err();
    assert!(matches!(
        err,
        PriceServiceError::Prediction(PriceCoreError::PredictionFailure(_))
    ));

    let metrics = service.metrics_snapshot();
    assert_eq!(metrics.error_count, 1);
    assert_eq!(metrics.total_predictions, 1);
    assert_eq!(service.history_len(), 1);
    assert_eq!(service.cache_len(), 1);

    // failures are not cached
    assert!(service.predict("broken listing", "").is_err());
    assert_eq!(service.metrics_snapshot().error_count, 2);
}
