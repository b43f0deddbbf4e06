//! One-time loading of the trained model artifacts
//!
//! Each artifact is read independently. A missing or malformed file is
//! logged and leaves its slot empty; it never aborts startup.

use crate::encoder::BrandEncoder;
use crate::gbdt::Model;
use crate::vectorizer::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File names of the artifacts inside the model directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFiles {
    pub regressor: String,
    pub vectorizer: String,
    pub brand_encoder: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            regressor: "regressor.json".to_string(),
            vectorizer: "tfidf_vectorizer.json".to_string(),
            brand_encoder: "brand_encoder.json".to_string(),
        }
    }
}

/// Presence flags, reported by status endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPresence {
    pub regressor: bool,
    pub vectorizer: bool,
    pub brand_encoder: bool,
}

/// Trained model artifacts; any of them may be absent
#[derive(Debug, Clone, Default)]
pub struct ModelArtifacts {
    pub regressor: Option<Model>,
    pub vectorizer: Option<TfidfVectorizer>,
    pub brand_encoder: Option<BrandEncoder>,
}

impl ModelArtifacts {
    /// No artifacts at all; forces heuristic-only prediction.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(regressor: Model, vectorizer: TfidfVectorizer, brand_encoder: BrandEncoder) -> Self {
        Self {
            regressor: Some(regressor),
            vectorizer: Some(vectorizer),
            brand_encoder: Some(brand_encoder),
        }
    }

    /// Load every artifact found in `dir`.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P, files: &ArtifactFiles) -> Self {
        let dir = dir.as_ref();
        info!("Loading model artifacts from {}", dir.display());

        Self {
            regressor: load_one(dir.join(&files.regressor), "regressor", |p| {
                Model::load_json(p)
            }),
            vectorizer: load_one(
                dir.join(&files.vectorizer),
                "TF-IDF vectorizer",
                |p| TfidfVectorizer::load_json(p),
            ),
            brand_encoder: load_one(
                dir.join(&files.brand_encoder),
                "brand encoder",
                |p| BrandEncoder::load_json(p),
            ),
        }
    }

    pub fn presence(&self) -> ArtifactPresence {
        ArtifactPresence {
            regressor: self.regressor.is_some(),
            vectorizer: self.vectorizer.is_some(),
            brand_encoder: self.brand_encoder.is_some(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.regressor.is_some() && self.vectorizer.is_some() && self.brand_encoder.is_some()
    }

    /// Names of the missing artifacts, for the unavailability reason.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.regressor.is_none() {
            missing.push("regressor");
        }
        if self.vectorizer.is_none() {
            missing.push("tfidf_vectorizer");
        }
        if self.brand_encoder.is_none() {
            missing.push("brand_encoder");
        }
        missing
    }
}

fn load_one<T, E, F>(path: PathBuf, label: &str, load: F) -> Option<T>
where
    F: FnOnce(&Path) -> Result<T, E>,
    E: Display,
{
    if !path.exists() {
        warn!("{} not found at {}", label, path.display());
        return None;
    }
    match load(&path) {
        Ok(artifact) => {
            info!("{} loaded from {}", label, path.display());
            Some(artifact)
        }
        Err(e) => {
            warn!("Failed to load {} from {}: {}", label, path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_directory_yields_empty() {
        let artifacts = ModelArtifacts::load_from_dir("/nonexistent/models", &ArtifactFiles::default());
        assert!(!artifacts.is_complete());
        assert_eq!(
            artifacts.missing(),
            vec!["regressor", "tfidf_vectorizer", "brand_encoder"]
        );
    }

    #[test]
    fn test_malformed_file_leaves_slot_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = ArtifactFiles::default();
        fs::write(dir.path().join(&files.brand_encoder), "not json").unwrap();
        fs::write(
            dir.path().join(&files.vectorizer),
            r#"{"vocabulary":{"apple":0},"idf":[1.0]}"#,
        )
        .unwrap();

        let artifacts = ModelArtifacts::load_from_dir(dir.path(), &files);
        assert!(artifacts.vectorizer.is_some());
        assert!(artifacts.brand_encoder.is_none());
        assert!(!artifacts.presence().regressor);
    }
}
