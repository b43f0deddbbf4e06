//! Dual-path price predictor
//!
//! A [`Predictor`] is built once from the loaded [`ModelArtifacts`] and
//! settles into one of two states for its whole lifetime:
//!
//! - `ModelReady`: all three artifacts are present and valid. Each request tries the
//!   regressor first; a failure for that request falls through to the
//!   heuristic without downgrading the state.
//! - `HeuristicOnly`: some artifact is missing or invalid. Every request
//!   uses the heuristic.

use crate::artifacts::{ArtifactPresence, ModelArtifacts};
use crate::catalog::{self, FeatureImportance, ModelPerformance, ModelStats};
use crate::encoder::BrandEncoder;
use crate::errors::{ModelPathError, PriceCoreError, Result};
use crate::features::{self, FeatureRecord};
use crate::gbdt::Model;
use crate::heuristic;
use crate::vectorizer::TfidfVectorizer;
use crate::{finalize_price, MAX_CONFIDENCE};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

const BASE_CONFIDENCE: f64 = 0.75;
const MAX_KEY_FEATURES: usize = 5;

/// Which code path produced a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionMethod {
    /// Trained regressor
    Model,
    /// Deterministic heuristic formula
    Heuristic,
    /// Boundary-level formula applied outside the core
    Fallback,
}

impl PredictionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PredictionMethod::Model => "ML Model",
            PredictionMethod::Heuristic => "Advanced Heuristics",
            PredictionMethod::Fallback => "Heuristic Fallback",
        }
    }
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub price: f64,
    pub method: PredictionMethod,
}

/// Price, confidence and explanation computed from a single extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub price: f64,
    pub method: PredictionMethod,
    pub confidence: f64,
    pub key_features: Vec<String>,
}

struct ReadyModel {
    regressor: Model,
    vectorizer: TfidfVectorizer,
    encoder: BrandEncoder,
    model_hash: String,
}

enum PredictorState {
    ModelReady(Box<ReadyModel>),
    HeuristicOnly { reason: String },
}

pub struct Predictor {
    state: PredictorState,
    presence: ArtifactPresence,
}

impl Predictor {
    /// Build a predictor, entering model mode only when every artifact is
    /// present and structurally valid.
    pub fn new(artifacts: ModelArtifacts) -> Self {
        let presence = artifacts.presence();
        let missing = artifacts.missing();

        let state = match artifacts {
            ModelArtifacts {
                regressor: Some(regressor),
                vectorizer: Some(vectorizer),
                brand_encoder: Some(encoder),
            } => match Self::check_artifacts(&regressor, &vectorizer, &encoder) {
                Ok(()) => Self::ready(regressor, vectorizer, encoder),
                Err(e) => Self::unavailable(format!("invalid artifacts: {e}")),
            },
            _ => Self::unavailable(format!("missing artifacts: {}", missing.join(", "))),
        };

        Self { state, presence }
    }

    /// Artifacts handed in directly skip the checks done by the loaders.
    fn check_artifacts(
        regressor: &Model,
        vectorizer: &TfidfVectorizer,
        encoder: &BrandEncoder,
    ) -> Result<()> {
        regressor
            .validate()
            .map_err(|e| PriceCoreError::InvalidArtifact {
                name: "regressor".to_string(),
                reason: e.to_string(),
            })?;
        vectorizer.validate()?;
        encoder.validate()
    }

    fn ready(regressor: Model, vectorizer: TfidfVectorizer, encoder: BrandEncoder) -> PredictorState {
        let model_hash = regressor.hash_hex().unwrap_or_else(|e| {
            warn!("Unable to hash regressor: {}", e);
            String::from("unknown")
        });
        info!(
            "Predictor ready: {} trees, vectorizer width {}, model hash {}",
            regressor.num_trees(),
            vectorizer.width(),
            model_hash
        );
        PredictorState::ModelReady(Box::new(ReadyModel {
            regressor,
            vectorizer,
            encoder,
            model_hash,
        }))
    }

    fn unavailable(reason: String) -> PredictorState {
        let err = PriceCoreError::ModelUnavailable(reason);
        warn!("{}; using heuristic pricing", err);
        PredictorState::HeuristicOnly {
            reason: err.to_string(),
        }
    }

    /// Predictor that never consults a model.
    pub fn heuristic_only() -> Self {
        Self::new(ModelArtifacts::empty())
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.state, PredictorState::ModelReady(_))
    }

    /// Why the predictor is heuristic-only, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            PredictorState::HeuristicOnly { reason } => Some(reason),
            PredictorState::ModelReady(_) => None,
        }
    }

    pub fn model_hash(&self) -> Option<&str> {
        match &self.state {
            PredictorState::ModelReady(ready) => Some(&ready.model_hash),
            PredictorState::HeuristicOnly { .. } => None,
        }
    }

    pub fn artifact_presence(&self) -> ArtifactPresence {
        self.presence
    }

    /// Method label reported by status endpoints.
    pub fn mode_label(&self) -> &'static str {
        if self.is_model_loaded() {
            PredictionMethod::Model.label()
        } else {
            PredictionMethod::Heuristic.label()
        }
    }

    pub fn predict(&self, title: &str, description: &str) -> Result<PricePrediction> {
        self.predict_features(&features::extract(title, description))
    }

    /// Predict from an already extracted record.
    ///
    /// Model-path failures are logged and answered by the heuristic. Only a
    /// heuristic failure is returned as an error.
    pub fn predict_features(&self, features: &FeatureRecord) -> Result<PricePrediction> {
        if let PredictorState::ModelReady(ready) = &self.state {
            match Self::model_price(ready, features) {
                Ok(price) => {
                    return Ok(PricePrediction {
                        price,
                        method: PredictionMethod::Model,
                    })
                }
                Err(e) => warn!("Model prediction failed, using heuristic: {}", e),
            }
        }

        let price = heuristic::predict(features)?;
        Ok(PricePrediction {
            price,
            method: PredictionMethod::Heuristic,
        })
    }

    /// Model input row: TF-IDF columns followed by
    /// `text_length, word_count, encoded_brand, has_quality_word`.
    fn feature_vector(ready: &ReadyModel, features: &FeatureRecord) -> Vec<f64> {
        let mut row = ready.vectorizer.transform(&features.normalized_text);
        row.extend_from_slice(&[
            features.text_length as f64,
            features.word_count as f64,
            ready.encoder.encode(features.brand) as f64,
            if features.has_quality_word { 1.0 } else { 0.0 },
        ]);
        row
    }

    fn model_price(
        ready: &ReadyModel,
        features: &FeatureRecord,
    ) -> std::result::Result<f64, ModelPathError> {
        let row = Self::feature_vector(ready, features);

        if let Some(expected) = ready.regressor.n_features {
            if row.len() != expected {
                return Err(ModelPathError::FeatureDimensionMismatch {
                    expected,
                    actual: row.len(),
                });
            }
        }

        let log_price = ready.regressor.predict(&row)?;
        let price = log_price.exp_m1();
        debug!("Model log-price {:.4} -> {:.2}", log_price, price);

        if !price.is_finite() {
            return Err(ModelPathError::NonFinite(log_price));
        }
        Ok(finalize_price(price))
    }

    pub fn confidence(&self, title: &str, description: &str) -> f64 {
        self.confidence_for(&features::extract(title, description))
    }

    pub fn confidence_for(&self, features: &FeatureRecord) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        if self.is_model_loaded() {
            confidence += 0.15;
        }
        if features.brand.is_known() {
            confidence += 0.10;
        }
        if features.has_quality_word {
            confidence += 0.05;
        }
        if features.word_count > 10 {
            confidence += 0.05;
        }
        confidence.clamp(0.0, MAX_CONFIDENCE)
    }

    pub fn explain(&self, title: &str, description: &str) -> Vec<String> {
        self.explain_for(&features::extract(title, description))
    }

    /// Up to five reasons, in fixed priority order.
    pub fn explain_for(&self, features: &FeatureRecord) -> Vec<String> {
        let mut reasons = Vec::new();
        if features.brand.is_known() {
            reasons.push(format!("Brand: {}", features.brand.display_name()));
        }
        if features.has_quality_word {
            reasons.push("Premium Quality".to_string());
        }
        if features.word_count > 15 {
            reasons.push("Detailed Description".to_string());
        }
        if features.text_length > 100 {
            reasons.push("Rich Content".to_string());
        }
        if self.is_model_loaded() {
            reasons.push("ML Model Analysis".to_string());
        }
        reasons.truncate(MAX_KEY_FEATURES);
        reasons
    }

    /// Price, confidence and explanation for one listing.
    pub fn assess(&self, title: &str, description: &str) -> Result<Assessment> {
        let features = features::extract(title, description);
        let prediction = self.predict_features(&features)?;
        Ok(Assessment {
            price: prediction.price,
            method: prediction.method,
            confidence: self.confidence_for(&features),
            key_features: self.explain_for(&features),
        })
    }

    pub fn model_stats(&self) -> ModelStats {
        catalog::model_stats()
    }

    pub fn feature_importance(&self) -> Vec<FeatureImportance> {
        catalog::feature_importance()
    }

    pub fn performance_comparison(&self) -> Vec<ModelPerformance> {
        catalog::performance_comparison()
    }
}
