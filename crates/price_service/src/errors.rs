//! Price service error types

use amazeworth_price_core::PriceCoreError;
use thiserror::Error;

/// Price service errors
#[derive(Error, Debug)]
pub enum PriceServiceError {
    #[error("Prediction failed: {0}")]
    Prediction(#[from] PriceCoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
