//! Print the canonical BLAKE3 hash of a regressor artifact.
//!
//! ```bash
//! model_hash models/regressor.json
//! ```

use amazeworth_price_core::Model;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    let model_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: model_hash <regressor.json>")?;

    let model = Model::load_json(&model_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

    let hash = model.hash_hex()?;
    println!("{hash}");
    println!("trees: {}", model.num_trees());
    if let Some(width) = model.n_features {
        println!("n_features: {width}");
    }
    Ok(())
}
