//! End-to-end predictor tests over artifacts written to disk

use amazeworth_price_core::{
    ArtifactFiles, BrandEncoder, Model, ModelArtifacts, Node, PredictionMethod, Predictor,
    TfidfVectorizer, Tree, MAX_CONFIDENCE, MAX_PRICE, MIN_PRICE, SCALE,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Vocabulary of three terms, so the model row is 3 + 4 columns wide.
fn vectorizer() -> TfidfVectorizer {
    let vocabulary = HashMap::from([
        ("apple".to_string(), 0),
        ("iphone".to_string(), 1),
        ("laptop".to_string(), 2),
    ]);
    TfidfVectorizer::new(vocabulary, vec![1.0, 1.5, 2.0], (1, 1))
}

/// Splits on the encoded brand (column 5): apple (1) -> log1p 7.0, else 4.0.
fn regressor(n_features: usize) -> Model {
    let tree = Tree::new(
        vec![
            Node::split(0, 5, SCALE, 1, 2),
            Node::split(1, 5, 0, 3, 4),
            Node::leaf(2, 4 * SCALE),
            Node::leaf(3, 4 * SCALE),
            Node::leaf(4, 7 * SCALE),
        ],
        SCALE,
    );
    Model::new(vec![tree], 0).with_n_features(n_features)
}

fn write_artifacts(dir: &Path, model: &Model) {
    let files = ArtifactFiles::default();
    model.save_json(dir.join(&files.regressor)).unwrap();
    fs::write(
        dir.join(&files.vectorizer),
        serde_json::to_string(&vectorizer()).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join(&files.brand_encoder),
        serde_json::to_string(&BrandEncoder::from_vocabulary()).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_loaded_model_predicts() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path(), &regressor(7));

    let artifacts = ModelArtifacts::load_from_dir(dir.path(), &ArtifactFiles::default());
    assert!(artifacts.is_complete());
    let predictor = Predictor::new(artifacts);
    assert!(predictor.is_model_loaded());

    let apple = predictor
        .predict("iPhone 14 Pro Max", "Latest Apple smartphone")
        .unwrap();
    assert_eq!(apple.method, PredictionMethod::Model);
    assert_eq!(apple.price, 1095.63);

    // samsung encodes to 8 -> right branch
    let other = predictor.predict("Samsung Galaxy", "").unwrap();
    assert_eq!(other.method, PredictionMethod::Model);
    assert_eq!(other.price, 53.6);
}

#[test]
fn test_model_hash_matches_saved_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = regressor(7);
    write_artifacts(dir.path(), &model);

    let predictor = Predictor::new(ModelArtifacts::load_from_dir(
        dir.path(),
        &ArtifactFiles::default(),
    ));
    assert_eq!(predictor.model_hash(), Some(model.hash_hex().unwrap().as_str()));
}

#[test]
fn test_mismatched_width_uses_heuristic_per_request() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path(), &regressor(5004));

    let predictor = Predictor::new(ModelArtifacts::load_from_dir(
        dir.path(),
        &ArtifactFiles::default(),
    ));
    assert!(predictor.is_model_loaded());

    let prediction = predictor.predict("Nike Shoes", "").unwrap();
    assert_eq!(prediction.method, PredictionMethod::Heuristic);
    assert!((MIN_PRICE..=MAX_PRICE).contains(&prediction.price));
    // still counted as model mode for confidence
    assert!((predictor.confidence("Nike Shoes", "") - 0.95).abs() < 1e-12);
}

#[test]
fn test_missing_encoder_is_heuristic_only() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path(), &regressor(7));
    fs::remove_file(dir.path().join(ArtifactFiles::default().brand_encoder)).unwrap();

    let predictor = Predictor::new(ModelArtifacts::load_from_dir(
        dir.path(),
        &ArtifactFiles::default(),
    ));
    assert!(!predictor.is_model_loaded());
    assert!(!predictor.artifact_presence().brand_encoder);

    let prediction = predictor.predict("iPhone", "").unwrap();
    assert_eq!(prediction.method, PredictionMethod::Heuristic);
}

#[test]
fn test_heuristic_is_deterministic_and_bounded() {
    let predictor = Predictor::heuristic_only();
    let inputs = [
        ("", ""),
        ("Nike Shoes", ""),
        ("iPhone 14 Pro Max", "Latest Apple smartphone with advanced features"),
        ("Dell laptop 1TB", "professional workstation"),
        ("Café Crème", "€€€ ✓"),
    ];

    for (title, description) in inputs {
        let first = predictor.predict(title, description).unwrap();
        let second = predictor.predict(title, description).unwrap();
        assert_eq!(first, second);
        assert!((MIN_PRICE..=MAX_PRICE).contains(&first.price));
        assert_eq!((first.price * 100.0).round() / 100.0, first.price);

        let confidence = predictor.confidence(title, description);
        assert!((0.0..=MAX_CONFIDENCE).contains(&confidence));
        assert!(predictor.explain(title, description).len() <= 5);
    }
}

#[test]
fn test_apple_outprices_unbranded_listing() {
    let predictor = Predictor::heuristic_only();
    let branded = predictor.predict("Apple phone case", "").unwrap();
    let plain = predictor.predict("Plain phone case", "").unwrap();
    assert!(branded.price > plain.price);
}
