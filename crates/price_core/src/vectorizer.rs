//! Fitted TF-IDF text vectorizer
//!
//! Only inference is supported: vocabulary and IDF weights come from the
//! training pipeline as a JSON artifact.

use crate::errors::{PriceCoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// TF-IDF vectorizer over word n-grams
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,
    /// IDF weight per column; its length is the output width
    pub idf: Vec<f64>,
    /// Inclusive word n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    /// Use `1 + ln(tf)` instead of raw counts
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>, ngram_range: (usize, usize)) -> Self {
        Self {
            vocabulary,
            idf,
            ngram_range,
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }

    /// Number of output columns
    pub fn width(&self) -> usize {
        self.idf.len()
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| PriceCoreError::InvalidArtifact {
            name: "tfidf_vectorizer".to_string(),
            reason,
        };

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(invalid(format!("bad ngram_range ({min_n}, {max_n})")));
        }
        if let Some((term, col)) = self.vocabulary.iter().find(|(_, col)| **col >= self.width()) {
            return Err(invalid(format!(
                "term '{term}' maps to column {col} outside width {}",
                self.width()
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(invalid("non-finite idf weight".to_string()));
        }
        Ok(())
    }

    /// Load and validate a vectorizer from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let vectorizer: TfidfVectorizer = serde_json::from_str(&json)?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Word n-grams of `tokens` within the configured range.
    fn ngrams(&self, tokens: &[&str]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut grams = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            grams.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        grams
    }

    /// Transform already-normalized text into a dense row of `width()` values.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for gram in self.ngrams(&tokens) {
            if let Some(&col) = self.vocabulary.get(&gram) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut row = vec![0.0; self.width()];
        for (col, count) in counts {
            // columns past the idf table are dropped
            if let (Some(cell), Some(idf)) = (row.get_mut(col), self.idf.get(col)) {
                let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
                *cell = tf * idf;
            }
        }

        if self.norm == Norm::L2 {
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|v| *v /= norm);
            }
        }
        row
    }
}
