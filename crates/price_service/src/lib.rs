//! AmazeWorth price service layer
//!
//! Wraps the prediction core with:
//! - A bounded FIFO result cache keyed on `(title, description)`
//! - Rolling prediction metrics and a bounded history log
//! - Analytics and health views for dashboards
//! - Environment-aware configuration
//! - The warp HTTP API

pub mod analytics;
pub mod cache;
pub mod config;
pub mod errors;
pub mod health;
pub mod history;
pub mod http;
pub mod metrics;
pub mod service;
pub mod types;

pub use cache::PredictionCache;
pub use config::{ConfigManager, Environment};
pub use errors::PriceServiceError;
pub use health::{HealthResponse, HealthStatus};
pub use history::HistoryLog;
pub use metrics::{MetricsSnapshot, MetricsTracker};
pub use service::{Clock, PredictionService, PriceAssessor, SystemClock};
pub use types::*;

/// Service crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
