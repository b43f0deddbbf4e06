//! Brand label encoder
//!
//! Maps a brand label to the integer class index the regressor was trained
//! with. Classes are sorted, matching the fit-time ordering.

use crate::errors::{PriceCoreError, Result};
use crate::features::{Brand, BRAND_PRIORITY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandEncoder {
    pub classes: Vec<String>,
}

impl BrandEncoder {
    /// Fit on the given labels: deduplicated and sorted.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Encoder fit on the closed brand vocabulary plus `unknown`.
    pub fn from_vocabulary() -> Self {
        Self::fit(
            BRAND_PRIORITY
                .iter()
                .map(|b| b.as_str())
                .chain(std::iter::once(UNKNOWN)),
        )
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| PriceCoreError::InvalidArtifact {
            name: "brand_encoder".to_string(),
            reason: reason.to_string(),
        };

        if !self.classes.windows(2).all(|w| w[0] < w[1]) {
            return Err(invalid("classes must be sorted and unique"));
        }
        if self.index_of(UNKNOWN).is_none() {
            return Err(invalid("classes must include 'unknown'"));
        }
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let encoder: BrandEncoder = serde_json::from_str(&json)?;
        encoder.validate()?;
        Ok(encoder)
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .ok()
    }

    /// Class index of `brand`; labels unseen at fit time map to `unknown`.
    pub fn encode(&self, brand: Brand) -> usize {
        self.index_of(brand.as_str())
            .or_else(|| self.index_of(UNKNOWN))
            .unwrap_or(0)
    }
}
