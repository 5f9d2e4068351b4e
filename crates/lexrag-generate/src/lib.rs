//! lexrag-generate
//!
//! Answer generation: model-agnostic beam search plus a candle T5 generator.
//! `generator_from_settings` is the single construction point.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lexrag_core::config::{resolve_with_base, GeneratorSettings};
use lexrag_core::{Error, Generator, Result};

pub mod beam;
pub mod prompt;
pub mod t5;

pub use beam::{beam_search, GenerationParams, StepModel};
pub use prompt::build_prompt;
pub use t5::T5Generator;

/// Loads the configured generator once; callers share the returned handle.
pub fn generator_from_settings(settings: &GeneratorSettings, base_dir: &Path) -> Result<Arc<dyn Generator>> {
    let model_dir = resolve_model_dir(settings, base_dir)?;
    let generator = T5Generator::load(&model_dir, &settings.model, GenerationParams::from(settings), settings.max_input_tokens)
        .map_err(Error::generation)?;
    Ok(Arc::new(generator))
}

/// Lookup order: configured `model_dir`, `APP_GENERATOR_MODEL_DIR`,
/// then `models/<model name>` under `base_dir`.
pub fn resolve_model_dir(settings: &GeneratorSettings, base_dir: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = &settings.model_dir {
        candidates.push(resolve_with_base(base_dir, dir));
    }
    if let Ok(dir) = std::env::var("APP_GENERATOR_MODEL_DIR") {
        candidates.push(resolve_with_base(base_dir, dir));
    }
    let name = settings.model.rsplit('/').next().unwrap_or(&settings.model);
    candidates.push(base_dir.join("models").join(name));

    candidates
        .into_iter()
        .find(|p| p.exists())
        .ok_or_else(|| Error::NotFound(format!("model directory for '{}'", settings.model)))
}
