//! Feature extraction from product title and description text
//!
//! Extraction is a pure function of its input: the same text always yields
//! the same [`FeatureRecord`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known brands in detection priority order.
pub const BRAND_PRIORITY: [Brand; 10] = [
    Brand::Apple,
    Brand::Samsung,
    Brand::Sony,
    Brand::Nike,
    Brand::Adidas,
    Brand::Lg,
    Brand::Hp,
    Brand::Dell,
    Brand::Lenovo,
    Brand::Asus,
];

/// Terms that mark a product as premium.
pub const QUALITY_WORDS: [&str; 6] = ["premium", "luxury", "professional", "pro", "ultra", "max"];

/// Closed brand vocabulary plus the `unknown` class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    Apple,
    Samsung,
    Sony,
    Nike,
    Adidas,
    Lg,
    Hp,
    Dell,
    Lenovo,
    Asus,
    Unknown,
}

impl Brand {
    /// Lowercase label, as matched in normalized text and stored by the encoder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Brand::Apple => "apple",
            Brand::Samsung => "samsung",
            Brand::Sony => "sony",
            Brand::Nike => "nike",
            Brand::Adidas => "adidas",
            Brand::Lg => "lg",
            Brand::Hp => "hp",
            Brand::Dell => "dell",
            Brand::Lenovo => "lenovo",
            Brand::Asus => "asus",
            Brand::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Brand::Unknown
    }

    /// Label with the first letter capitalized ("Apple", "Lg").
    pub fn display_name(&self) -> String {
        let label = self.as_str();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed feature record derived from `(title, description)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Lowercased text restricted to `[a-z0-9 ]` with single spaces
    pub normalized_text: String,
    /// Length of the normalized text
    pub text_length: usize,
    /// Number of whitespace-separated words in the normalized text
    pub word_count: usize,
    /// First brand of [`BRAND_PRIORITY`] found in the text
    pub brand: Brand,
    /// Whether any of [`QUALITY_WORDS`] occurs in the text
    pub has_quality_word: bool,
}

/// Combine and normalize title and description.
///
/// Characters outside `[a-z0-9]` become spaces, then runs of whitespace
/// collapse to a single space and the ends are trimmed.
pub fn normalize_text(title: &str, description: &str) -> String {
    let combined = format!("{title} {description}");
    let replaced: String = combined
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Detect the highest-priority brand occurring as a substring of `text`.
pub fn detect_brand(text: &str) -> Brand {
    BRAND_PRIORITY
        .iter()
        .copied()
        .find(|brand| text.contains(brand.as_str()))
        .unwrap_or(Brand::Unknown)
}

/// Whether `text` contains any quality term.
pub fn has_quality_word(text: &str) -> bool {
    QUALITY_WORDS.iter().any(|word| text.contains(word))
}

/// Extract the feature record for a product listing.
pub fn extract(title: &str, description: &str) -> FeatureRecord {
    let normalized_text = normalize_text(title, description);
    let text_length = normalized_text.len();
    let word_count = normalized_text.split_whitespace().count();
    let brand = detect_brand(&normalized_text);
    let has_quality_word = has_quality_word(&normalized_text);

    FeatureRecord {
        normalized_text,
        text_length,
        word_count,
        brand,
        has_quality_word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_punctuation_and_collapses() {
        assert_eq!(
            normalize_text("  iPhone-14 Pro!!", "Latest\tApple\nphone"),
            "iphone 14 pro latest apple phone"
        );
    }

    #[test]
    fn test_empty_description() {
        let record = extract("Nike Shoes", "");
        assert_eq!(record.normalized_text, "nike shoes");
        assert_eq!(record.text_length, 10);
        assert_eq!(record.word_count, 2);
        assert_eq!(record.brand, Brand::Nike);
        assert!(!record.has_quality_word);
    }

    #[test]
    fn test_empty_input() {
        let record = extract("", "");
        assert_eq!(record.normalized_text, "");
        assert_eq!(record.text_length, 0);
        assert_eq!(record.word_count, 0);
        assert_eq!(record.brand, Brand::Unknown);
    }

    #[test]
    fn test_brand_priority() {
        // sony precedes lg in priority regardless of position in text
        assert_eq!(detect_brand("lg monitor with sony speakers"), Brand::Sony);
        assert_eq!(detect_brand("samsung case for apple watch"), Brand::Apple);
    }

    #[test]
    fn test_brand_is_substring_match() {
        assert_eq!(detect_brand("hpc cluster"), Brand::Hp);
        assert_eq!(detect_brand("wooden chair"), Brand::Unknown);
    }

    #[test]
    fn test_quality_detection() {
        assert!(has_quality_word("iphone 14 pro max"));
        assert!(has_quality_word("maximum comfort"));
        assert!(!has_quality_word("basic cotton shirt"));
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(normalize_text("Café Crème", ""), "caf cr me");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Brand::Apple.display_name(), "Apple");
        assert_eq!(Brand::Lg.display_name(), "Lg");
    }
}
