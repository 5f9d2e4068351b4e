//! Builds the aligned chunk store and vector index from preprocessed documents.

use indicatif::{ProgressBar, ProgressStyle};

use lexrag_core::preprocess::{ChunkingConfig, Preprocessor};
use lexrag_core::{ChunkStore, Document, Embedder, Error, Metric, Result};
use lexrag_vector::VectorIndex;

/// Chunks every document and embeds the chunks in batches of `batch_size`.
///
/// The returned store and index share one ordering: row `i` embeds chunk `i`.
pub fn build_artifacts(
    documents: &[Document],
    max_words: usize,
    embedder: &dyn Embedder,
    batch_size: usize,
    metric: Metric,
) -> Result<(ChunkStore, VectorIndex)> {
    if max_words == 0 || batch_size == 0 {
        return Err(Error::InvalidArgument("max_words and batch_size must be at least 1".to_string()));
    }
    let chunks = Preprocessor::new(ChunkingConfig { max_words }).chunk_documents(documents);

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut embeddings = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::EmbeddingFailure(format!(
                "embedded {} of {} texts in batch",
                vectors.len(),
                texts.len()
            )));
        }
        embeddings.extend(vectors);
        pb.inc(batch.len() as u64);
    }
    pb.finish_with_message("embedded");

    let index = VectorIndex::build(&embeddings, metric)?;
    if !index.is_empty() && index.dim() != embedder.dim() {
        return Err(Error::DimensionMismatch { expected: embedder.dim(), actual: index.dim() });
    }
    let store = ChunkStore::from_chunks(chunks);
    tracing::info!(chunks = store.len(), dim = index.dim(), metric = %metric, model = embedder.model_id(), "artifacts built");
    Ok((store, index))
}
