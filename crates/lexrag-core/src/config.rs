//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_RETRIEVAL__TOP_K`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against the directory the configuration was loaded from.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{ContextPolicy, Metric};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub index_path: String,
    pub documents_path: String,
    pub corpus_path: String,
    pub raw_csv_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            index_path: "data/legal_documents/index.safetensors".to_string(),
            documents_path: "data/legal_documents/documents.json".to_string(),
            corpus_path: "data/legal_documents/preprocessed_dataframe.csv".to_string(),
            raw_csv_path: "data/legal_documents/legal_text_classification.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model: String,
    pub model_dir: Option<String>,
    pub max_len: usize,
    pub batch_size: usize,
    pub use_fake: bool,
    pub fake_dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            model_dir: None,
            max_len: 256,
            batch_size: 32,
            use_fake: false,
            fake_dim: 384,
        }
    }
}

/// Decoding parameters. They shape the generator's output only, never the
/// pipeline's control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub model: String,
    pub model_dir: Option<String>,
    pub max_length: usize,
    pub num_beams: usize,
    pub no_repeat_ngram_size: usize,
    pub early_stopping: bool,
    pub max_input_tokens: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: "google/flan-t5-base".to_string(),
            model_dir: None,
            max_length: 200,
            num_beams: 4,
            no_repeat_ngram_size: 3,
            early_stopping: true,
            max_input_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub metric: Metric,
    pub top_k: usize,
    pub context_policy: ContextPolicy,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { metric: Metric::Euclidean, top_k: 5, context_policy: ContextPolicy::ChunkConcat }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub max_words: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { max_words: 512 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub embedding: EmbeddingSettings,
    pub generator: GeneratorSettings,
    pub retrieval: RetrievalSettings,
    pub chunking: ChunkingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("retrieval.top_k", self.retrieval.top_k),
            ("chunking.max_words", self.chunking.max_words),
            ("embedding.max_len", self.embedding.max_len),
            ("embedding.batch_size", self.embedding.batch_size),
            ("embedding.fake_dim", self.embedding.fake_dim),
            ("generator.max_length", self.generator.max_length),
            ("generator.num_beams", self.generator.num_beams),
            ("generator.max_input_tokens", self.generator.max_input_tokens),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("'{key}' must be at least 1")));
            }
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
    settings: Settings,
    base_dir: PathBuf,
}

impl Config {
    /// Loads from the current directory, layering by `RUST_ENV` (default `dev`).
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let base_dir = env::current_dir()?;
        Self::load_from(&base_dir, &env_name)
    }

    pub fn load_from(base_dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let settings: Settings = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        tracing::debug!(env = env_name, base = %base_dir.display(), "configuration loaded");
        Ok(Self { figment, settings, base_dir: base_dir.to_path_buf() })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Extracts an arbitrary key, e.g. `config.get::<usize>("retrieval.top_k")`.
    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Resolves a configured path against the config's base directory.
    pub fn path(&self, p: &str) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }
}

/// `${VAR}`/`$VAR` and a leading `~` are expanded; the result is not canonicalized.
/// Unknown variables are left as written.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let raw = input.as_ref();
    let with_vars = shellexpand::env(raw).unwrap_or(std::borrow::Cow::Borrowed(raw));
    PathBuf::from(shellexpand::tilde(&with_vars).into_owned())
}

/// Expands `p`, then anchors it at `base` unless it is already absolute.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let expanded = expand_path(p);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
