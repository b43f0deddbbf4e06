//! AmazeWorth price prediction core
//!
//! Estimates a product's price from its title and description text.
//!
//! Modules:
//! - `features`: Text normalization, brand and quality detection
//! - `vectorizer`: TF-IDF transform loaded from a trained artifact
//! - `encoder`: Brand label encoder
//! - `gbdt`: Fixed-point gradient-boosted tree regressor
//! - `artifacts`: One-time artifact loading from a model directory
//! - `heuristic`: Deterministic fallback pricing formula
//! - `predictor`: Model-or-heuristic predictor with confidence and explanations
//! - `catalog`: Static model performance tables
//! - `hashing`: Stable FNV-1a hashing for cache keys and variance

pub mod artifacts;
pub mod catalog;
pub mod encoder;
pub mod errors;
pub mod features;
pub mod gbdt;
pub mod hashing;
pub mod heuristic;
pub mod predictor;
pub mod serde_canon;
pub mod vectorizer;

pub use artifacts::{ArtifactFiles, ArtifactPresence, ModelArtifacts};
pub use catalog::{FeatureImportance, ModelPerformance, ModelStats};
pub use encoder::BrandEncoder;
pub use errors::{ModelPathError, PriceCoreError, Result};
pub use features::{extract, Brand, FeatureRecord};
pub use gbdt::{Model, ModelError, Node, Tree, SCALE};
pub use hashing::{cache_key, stable_hash};
pub use predictor::{Assessment, PredictionMethod, PricePrediction, Predictor};
pub use vectorizer::TfidfVectorizer;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lowest price ever reported
pub const MIN_PRICE: f64 = 50.0;

/// Highest price ever reported
pub const MAX_PRICE: f64 = 150_000.0;

/// Confidence ceiling
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Round to cents, then clamp into `[MIN_PRICE, MAX_PRICE]`.
///
/// NaN clamps to `MIN_PRICE`.
pub fn finalize_price(price: f64) -> f64 {
    if price.is_nan() {
        return MIN_PRICE;
    }
    let rounded = (price * 100.0).round() / 100.0;
    rounded.clamp(MIN_PRICE, MAX_PRICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_rounds_then_clamps() {
        assert_eq!(finalize_price(123.456), 123.46);
        assert_eq!(finalize_price(49.999), 50.0);
        assert_eq!(finalize_price(10.0), MIN_PRICE);
        assert_eq!(finalize_price(1e9), MAX_PRICE);
        assert_eq!(finalize_price(f64::INFINITY), MAX_PRICE);
        assert_eq!(finalize_price(f64::NAN), MIN_PRICE);
    }
}
