//! Static model-performance tables reported alongside live metrics.
//!
//! These figures come from offline evaluation of the trained regressor
//! (SMAPE on the held-out split) and do not change at runtime.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    pub smape_score: f64,
    pub accuracy: f64,
    /// Training wall time in minutes
    pub training_time: u32,
    pub model_variants: u32,
    pub model_type: String,
    pub features_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
    /// Chart color as a hex string
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub model: String,
    pub smape: f64,
    pub accuracy: f64,
}

pub fn model_stats() -> ModelStats {
    ModelStats {
        smape_score: 35.1,
        accuracy: 95.2,
        training_time: 3,
        model_variants: 4,
        model_type: "LightGBM + TF-IDF".to_string(),
        features_used: ["text_analysis", "brand_detection", "quality_indicators", "length_features"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

pub fn feature_importance() -> Vec<FeatureImportance> {
    [
        ("Product Description", 35.0, "#FF9900"),
        ("Brand Recognition", 22.0, "#232F3E"),
        ("Quality Indicators", 18.0, "#00A8E1"),
        ("Text Length", 15.0, "#7B68EE"),
        ("Category Detection", 10.0, "#32CD32"),
    ]
    .iter()
    .map(|(feature, importance, color)| FeatureImportance {
        feature: feature.to_string(),
        importance: *importance,
        color: color.to_string(),
    })
    .collect()
}

/// SMAPE and accuracy of successive model generations, oldest first.
pub fn performance_comparison() -> Vec<ModelPerformance> {
    [
        ("Baseline", 47.2, 82.5),
        ("Enhanced", 38.5, 88.3),
        ("LightGBM", 35.1, 95.2),
        ("Current", 33.8, 96.1),
    ]
    .iter()
    .map(|(model, smape, accuracy)| ModelPerformance {
        model: model.to_string(),
        smape: *smape,
        accuracy: *accuracy,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_consistent() {
        let importance: f64 = feature_importance().iter().map(|f| f.importance).sum();
        assert_eq!(importance, 100.0);

        let current = performance_comparison();
        assert_eq!(current.len(), 4);
        assert_eq!(current[2].smape, model_stats().smape_score);
    }
}
