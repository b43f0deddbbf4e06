//! Deterministic heuristic pricing used when the regressor is unavailable
//! or fails for a request.

use crate::errors::{PriceCoreError, Result};
use crate::features::{Brand, FeatureRecord};
use crate::finalize_price;
use crate::hashing::stable_hash;

const PRICE_PER_WORD: f64 = 25.0;
const QUALITY_MULTIPLIER: f64 = 1.6;
const STORAGE_MULTIPLIER: f64 = 1.4;
const PHONE_FLOOR: f64 = 400.0;
const COMPUTER_FLOOR: f64 = 600.0;
const VARIANCE_FACTOR: f64 = 0.0001;

pub const STORAGE_TERMS: [&str; 3] = ["1tb", "512gb", "256gb"];
pub const PHONE_TERMS: [&str; 2] = ["smartphone", "phone"];
pub const COMPUTER_TERMS: [&str; 2] = ["laptop", "computer"];

/// Price multiplier for a detected brand
pub fn brand_multiplier(brand: Brand) -> f64 {
    match brand {
        Brand::Apple => 4.0,
        Brand::Samsung => 2.8,
        Brand::Sony => 2.5,
        Brand::Nike => 2.2,
        Brand::Adidas => 2.0,
        Brand::Lg => 1.8,
        Brand::Hp => 1.7,
        Brand::Dell => 1.6,
        Brand::Lenovo => 1.4,
        Brand::Asus => 1.5,
        Brand::Unknown => 1.0,
    }
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// Base price before multipliers, with the category floor applied.
pub fn base_price(features: &FeatureRecord) -> f64 {
    let base = features.word_count as f64 * PRICE_PER_WORD;
    let text = features.normalized_text.as_str();
    if contains_any(text, &PHONE_TERMS) {
        base.max(PHONE_FLOOR)
    } else if contains_any(text, &COMPUTER_TERMS) {
        base.max(COMPUTER_FLOOR)
    } else {
        base
    }
}

/// Combined brand, quality and storage multiplier.
pub fn multiplier(features: &FeatureRecord) -> f64 {
    let mut multiplier = brand_multiplier(features.brand);
    if features.has_quality_word {
        multiplier *= QUALITY_MULTIPLIER;
    }
    if contains_any(&features.normalized_text, &STORAGE_TERMS) {
        multiplier *= STORAGE_MULTIPLIER;
    }
    multiplier
}

/// Pseudo-variance in `[-5%, +5%)` of `price`, a pure function of the text.
pub fn variance(text: &str, price: f64) -> f64 {
    let bucket = (stable_hash(text) % 1000) as f64;
    (bucket - 500.0) * price * VARIANCE_FACTOR
}

/// Heuristic price for a feature record, rounded and clamped.
pub fn predict(features: &FeatureRecord) -> Result<f64> {
    let price = base_price(features) * multiplier(features);
    let price = price + variance(&features.normalized_text, price);

    if !price.is_finite() {
        return Err(PriceCoreError::PredictionFailure(format!(
            "heuristic produced non-finite price for '{}'",
            features.normalized_text
        )));
    }
    Ok(finalize_price(price))
}
