//! Composition root: loads every artifact and model once from configuration
//! and wires them into shared, read-only collaborators.

use std::sync::Arc;

use lexrag_core::config::Config;
use lexrag_core::{ChunkStore, Corpus, Embedder, Generator, Result};
use lexrag_embed::embedder_from_settings;
use lexrag_generate::generator_from_settings;
use lexrag_vector::load_index;

use crate::context::ContextAssembler;
use crate::pipeline::RagPipeline;
use crate::retriever::Retriever;

/// Everything retrieval needs, without the generator model.
pub struct RetrievalSystem {
    pub retriever: Retriever,
    pub corpus: Arc<Corpus>,
    pub embedder: Arc<dyn Embedder>,
}

impl RetrievalSystem {
    /// Fails with `NotFound`/`CorruptData` before any query is served.
    pub fn load(config: &Config) -> Result<Self> {
        let settings = config.settings();
        let store = ChunkStore::load(&config.path(&settings.data.documents_path))?;
        let index = load_index(&config.path(&settings.data.index_path), settings.retrieval.metric)?;
        let corpus = Corpus::load(&config.path(&settings.data.corpus_path))?;
        let embedder = embedder_from_settings(&settings.embedding, config.base_dir())?;
        let retriever = Retriever::new(Arc::new(store), Arc::new(index), embedder.clone())?;
        Ok(Self { retriever, corpus: Arc::new(corpus), embedder })
    }
}

/// The full question-answering stack.
pub struct RagSystem {
    pub pipeline: RagPipeline,
    pub corpus: Arc<Corpus>,
    pub generator: Arc<dyn Generator>,
}

impl RagSystem {
    pub fn load(config: &Config) -> Result<Self> {
        let RetrievalSystem { retriever, corpus, .. } = RetrievalSystem::load(config)?;
        let settings = config.settings();
        let generator = generator_from_settings(&settings.generator, config.base_dir())?;
        Self::assemble(retriever, corpus, generator, config)
    }

    /// Wires already-loaded collaborators per the configured retrieval settings.
    pub fn assemble(retriever: Retriever, corpus: Arc<Corpus>, generator: Arc<dyn Generator>, config: &Config) -> Result<Self> {
        let retrieval = &config.settings().retrieval;
        let pipeline = RagPipeline::new(retriever, ContextAssembler::with_documents(corpus.clone()), generator.clone())
            .with_policy(retrieval.context_policy)?
            .with_default_top_k(retrieval.top_k);
        tracing::info!(policy = ?retrieval.context_policy, top_k = retrieval.top_k, "rag pipeline ready");
        Ok(Self { pipeline, corpus, generator })
    }
}
