use std::sync::Arc;

use lexrag_core::{ChunkStore, Embedder, Error, RetrievalResult, RetrievedChunk, Result};
use lexrag_vector::VectorIndex;

/// Query text -> top-k chunks with their owning case ids.
///
/// The store and index are read-only after construction and shared freely;
/// row `i` of the index is chunk `i` of the store.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<ChunkStore>,
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    /// Fails with `CorruptData` if the store and index are not aligned, or the
    /// embedder produces vectors of a different width than the index holds.
    pub fn new(store: Arc<ChunkStore>, index: Arc<VectorIndex>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if store.len() != index.len() {
            return Err(Error::CorruptData(format!(
                "chunk store holds {} chunks but vector index holds {} vectors",
                store.len(),
                index.len()
            )));
        }
        if !index.is_empty() && embedder.dim() != index.dim() {
            return Err(Error::CorruptData(format!(
                "embedder '{}' produces {}-d vectors, index holds {}-d vectors",
                embedder.model_id(),
                embedder.dim(),
                index.dim()
            )));
        }
        Ok(Self { store, index, embedder })
    }

    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<RetrievalResult> {
        if query.trim().is_empty() {
            return Err(Error::InvalidArgument("query must not be empty".to_string()));
        }
        if top_k == 0 {
            return Err(Error::InvalidArgument("top_k must be at least 1".to_string()));
        }
        let vector = self.embedder.embed(query)?;
        let neighbors = self.index.search(&vector, top_k)?;
        let mut hits = Vec::with_capacity(neighbors.len());
        for n in neighbors {
            let chunk = self.store.get(n.index)?.clone();
            hits.push(RetrievedChunk { index: n.index, distance: n.distance, chunk });
        }
        tracing::debug!(top_k, hits = hits.len(), "retrieved");
        Ok(RetrievalResult { hits })
    }
}
