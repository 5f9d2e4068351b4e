//! lexrag-embed
//!
//! Embedding collaborators: a candle BERT sentence embedder and a weight-free
//! hashing embedder. `embedder_from_settings` is the single construction point.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexrag_core::config::{resolve_with_base, EmbeddingSettings};
use lexrag_core::{Embedder, Error, Result};

use candle_core::Device;

pub mod bert;
pub mod hash;
pub mod pool;
pub mod tokenize;

pub use bert::BertEmbedder;
pub use hash::HashEmbedder;
pub use pool::masked_mean_l2;

/// Metal when built with the `metal` feature and a GPU answers, CPU otherwise.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            tracing::info!(device = "metal", "compute device selected");
            return device;
        }
        Err(e) => tracing::warn!(error = %e, "metal unavailable, falling back to cpu"),
    }
    tracing::info!(device = "cpu", "compute device selected");
    Device::Cpu
}

/// Builds the configured embedder once; callers share the returned handle.
///
/// `APP_USE_FAKE_EMBEDDINGS=1` forces the hashing embedder regardless of config.
pub fn embedder_from_settings(settings: &EmbeddingSettings, base_dir: &Path) -> Result<Arc<dyn Embedder>> {
    let forced_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if settings.use_fake || forced_fake {
        tracing::info!(dim = settings.fake_dim, "using hash embedder");
        return Ok(Arc::new(HashEmbedder::new(settings.fake_dim)));
    }
    let model_dir = resolve_model_dir(settings, base_dir)?;
    let embedder = BertEmbedder::load(&model_dir, &settings.model, settings.max_len)
        .map_err(Error::embedding)?;
    Ok(Arc::new(embedder))
}

/// Lookup order: configured `model_dir`, `APP_MODEL_DIR`, `MODEL_DIR`,
/// then `models/<model name>` under `base_dir`.
pub fn resolve_model_dir(settings: &EmbeddingSettings, base_dir: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = &settings.model_dir {
        candidates.push(resolve_with_base(base_dir, dir));
    }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            candidates.push(resolve_with_base(base_dir, dir));
        }
    }
    let name = settings.model.rsplit('/').next().unwrap_or(&settings.model);
    candidates.push(base_dir.join("models").join(name));

    candidates
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| Error::NotFound(format!("model directory for '{}'", settings.model)))
}
