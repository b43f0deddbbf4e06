//! Tree-ensemble regressor with fixed-point inference
//!
//! The regressor predicts `log1p(price)`. Inputs are quantized to integers
//! at `scale` before traversal, so a given feature vector scores the same
//! on every platform.

use super::tree::Tree;
use crate::serde_canon::{hash_canonical_hex, to_canonical_json, CanonicalError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Regressor errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Canonical serialization error: {0}")]
    CanonicalError(#[from] CanonicalError),

    #[error("Traversal failed in tree {0}")]
    TraversalFailed(usize),

    #[error("Fixed-point overflow in tree {0}")]
    Overflow(usize),
}

/// Default fixed-point scale (1e6)
pub const SCALE: i64 = 1_000_000;

/// Gradient-boosted regression ensemble
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    /// Format version (always 1)
    pub version: i32,

    /// Fixed-point scale for thresholds, inputs and tree weights
    pub scale: i64,

    /// Trees in the ensemble
    pub trees: Vec<Tree>,

    /// Bias term (fixed-point)
    pub bias: i64,

    /// Divisor turning the summed score into log-price units
    pub post_scale: i64,

    /// Input width the ensemble was trained on, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_features: Option<usize>,
}

impl Model {
    pub fn new(trees: Vec<Tree>, bias: i64) -> Self {
        Self {
            version: 1,
            scale: SCALE,
            trees,
            bias,
            post_scale: SCALE,
            n_features: None,
        }
    }

    /// Record the expected input width.
    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = Some(n_features);
        self
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != 1 {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }
        if self.scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "Invalid scale: {}",
                self.scale
            )));
        }
        if self.post_scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "Invalid post_scale: {}",
                self.post_scale
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "Model has no trees".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {i} validation failed: {e}"))
            })?;
            if let (Some(width), Some(max_idx)) = (self.n_features, tree.max_feature_idx()) {
                if max_idx >= width {
                    return Err(ModelError::ValidationFailed(format!(
                        "Tree {i} splits on feature {max_idx} but n_features is {width}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Quantize a real-valued input to the model's fixed-point grid.
    pub fn quantize(&self, value: f64) -> i64 {
        (value * self.scale as f64).round() as i64
    }

    /// Sum of weighted leaf outputs plus bias, at `post_scale`.
    pub fn score(&self, features: &[i64]) -> Result<i64, ModelError> {
        if self.scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "Invalid scale: {}",
                self.scale
            )));
        }
        let mut sum = self.bias;
        for (i, tree) in self.trees.iter().enumerate() {
            let leaf = tree.evaluate(features).ok_or(ModelError::TraversalFailed(i))?;
            let weighted = leaf
                .checked_mul(tree.weight)
                .ok_or(ModelError::Overflow(i))?;
            sum = sum
                .checked_add(weighted / self.scale)
                .ok_or(ModelError::Overflow(i))?;
        }
        Ok(sum)
    }

    /// Predict `log1p(price)` for a real-valued feature vector.
    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if self.post_scale <= 0 {
            return Err(ModelError::ValidationFailed(format!(
                "Invalid post_scale: {}",
                self.post_scale
            )));
        }
        let quantized: Vec<i64> = features.iter().map(|v| self.quantize(*v)).collect();
        let raw = self.score(&quantized)?;
        Ok(raw as f64 / self.post_scale as f64)
    }

    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    /// Blake3 hash of the canonical JSON form, hex-encoded
    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(hash_canonical_hex(self)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        fs::write(path, self.to_canonical_json()?)?;
        Ok(())
    }

    /// Load and validate a model from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        let model: Model = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::tree::Node;

    fn create_test_model() -> Model {
        let tree1 = Tree::new(
            vec![
                Node::split(0, 0, 50 * SCALE, 1, 2),
                Node::leaf(1, 4 * SCALE),
                Node::leaf(2, 6 * SCALE),
            ],
            SCALE,
        );
        let tree2 = Tree::new(
            vec![
                Node::split(0, 1, SCALE / 2, 1, 2),
                Node::leaf(1, -SCALE),
                Node::leaf(2, SCALE),
            ],
            SCALE / 2,
        );
        Model::new(vec![tree1, tree2], 0)
    }

    #[test]
    fn test_model_creation() {
        let model = create_test_model();
        assert_eq!(model.version, 1);
        assert_eq!(model.num_trees(), 2);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_score_weights_trees() {
        let model = create_test_model();
        // tree1 left: 4.0, tree2 right: 1.0 * 0.5
        let score = model.score(&[30 * SCALE, SCALE]).unwrap();
        assert_eq!(score, 4 * SCALE + SCALE / 2);
    }

    #[test]
    fn test_predict_quantizes_inputs() {
        let model = create_test_model();
        let log_price = model.predict(&[60.0, 0.25]).unwrap();
        // tree1 right: 6.0, tree2 left: -1.0 * 0.5
        assert!((log_price - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_short_input_fails_traversal() {
        let model = create_test_model();
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ModelError::TraversalFailed(1))
        ));
    }

    #[test]
    fn test_overflowing_leaf_is_an_error() {
        let tree = Tree::new(vec![Node::leaf(0, i64::MAX)], 2 * SCALE);
        let model = Model::new(vec![tree], 0);
        assert!(matches!(model.score(&[]), Err(ModelError::Overflow(0))));
    }

    #[test]
    fn test_unvalidated_zero_scale_is_an_error() {
        let mut model = create_test_model();
        model.scale = 0;
        assert!(matches!(
            model.score(&[0, 0]),
            Err(ModelError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_n_features_validation() {
        let model = create_test_model().with_n_features(2);
        assert!(model.validate().is_ok());

        let narrow = create_test_model().with_n_features(1);
        assert!(narrow.validate().is_err());
    }

    #[test]
    fn test_model_validation() {
        let mut invalid = create_test_model();
        invalid.scale = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = create_test_model();
        invalid.version = 999;
        assert!(invalid.validate().is_err());

        assert!(Model::new(vec![], 0).validate().is_err());
    }

    #[test]
    fn test_hash_is_stable_and_content_sensitive() {
        let a = create_test_model();
        let b = create_test_model();
        assert_eq!(a.hash_hex().unwrap(), b.hash_hex().unwrap());
        assert_eq!(a.hash_hex().unwrap().len(), 64);

        let mut c = create_test_model();
        c.bias = 1;
        assert_ne!(a.hash_hex().unwrap(), c.hash_hex().unwrap());
    }

    #[test]
    fn test_save_load_json() {
        let model = create_test_model().with_n_features(2);
        let temp_file = tempfile::NamedTempFile::new().unwrap();

        model.save_json(temp_file.path()).unwrap();
        let loaded = Model::load_json(temp_file.path()).unwrap();

        assert_eq!(model, loaded);
        assert_eq!(loaded.n_features, Some(2));
    }
}
