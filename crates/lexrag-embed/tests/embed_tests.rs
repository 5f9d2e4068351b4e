use lexrag_core::config::EmbeddingSettings;
use lexrag_core::{Embedder, Error};
use lexrag_embed::{embedder_from_settings, resolve_model_dir, HashEmbedder};
use tempfile::TempDir;

#[test]
fn hash_embedder_shapes_and_determinism() {
    let embedder = HashEmbedder::new(384);
    let texts = vec!["apparent bias fair minded observer".to_string(), "apparent bias fair minded observer".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn embed_returns_single_vector_of_dim() {
    let embedder = HashEmbedder::new(64);
    let v = embedder.embed("cost orders without trial").expect("embed");
    assert_eq!(v.len(), 64);
    assert_ne!(v, embedder.embed("indemnity costs").unwrap());
}

#[test]
fn settings_can_select_hash_embedder() {
    let tmp = TempDir::new().unwrap();
    let settings = EmbeddingSettings { use_fake: true, fake_dim: 32, ..EmbeddingSettings::default() };
    let embedder = embedder_from_settings(&settings, tmp.path()).expect("embedder");
    assert_eq!(embedder.dim(), 32);
    assert!(embedder.model_id().starts_with("hash:"));
}

#[test]
fn model_dir_resolution() {
    let tmp = TempDir::new().unwrap();
    let settings = EmbeddingSettings { model: "org/definitely-missing-model".to_string(), ..EmbeddingSettings::default() };
    if std::env::var("APP_MODEL_DIR").is_err() && std::env::var("MODEL_DIR").is_err() {
        assert!(matches!(resolve_model_dir(&settings, tmp.path()), Err(Error::NotFound(_))));
    }

    std::fs::create_dir_all(tmp.path().join("models/definitely-missing-model")).unwrap();
    let dir = resolve_model_dir(&settings, tmp.path()).expect("resolved");
    assert!(dir.exists());

    let configured = EmbeddingSettings { model_dir: Some("weights".to_string()), ..settings };
    std::fs::create_dir_all(tmp.path().join("weights")).unwrap();
    assert_eq!(resolve_model_dir(&configured, tmp.path()).unwrap(), tmp.path().join("weights"));
}
