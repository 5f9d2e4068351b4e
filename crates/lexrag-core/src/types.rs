//! Domain types shared by the store, index, retriever and pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a case record in the corpus table.
pub type CaseId = i64;

/// One case record after preprocessing.
///
/// `cleaned_text` is derived from `raw_text` and is what chunks are cut from
/// and what the full-document context policy hands to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub case_id: CaseId,
    pub title: String,
    pub raw_text: String,
    pub cleaned_text: String,
}

/// A word-bounded slice of a document's cleaned text, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub case_id: CaseId,
}

impl Chunk {
    pub fn new(text: impl Into<String>, case_id: CaseId) -> Self {
        Self { text: text.into(), case_id }
    }
}

/// Distance function used by the vector index.
///
/// Must match whatever the stored embeddings were produced for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Squared L2 distance.
    #[default]
    Euclidean,
    /// Negated dot product, so smaller is still closer.
    InnerProduct,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => f.write_str("euclidean"),
            Self::InnerProduct => f.write_str("inner-product"),
        }
    }
}

/// How retrieved chunks become the generator's context string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextPolicy {
    /// Retrieved chunk texts joined by a single space, in rank order.
    #[default]
    ChunkConcat,
    /// Full cleaned text of each distinct owning document.
    FullDocument,
}

/// A single ranked hit: the chunk plus where it sits in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub index: usize,
    pub distance: f32,
    pub chunk: Chunk,
}

/// Hits ordered by ascending distance to the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub hits: Vec<RetrievedChunk>,
}

impl RetrievalResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Chunk texts in rank order.
    pub fn chunks(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.chunk.text.as_str()).collect()
    }

    /// Owning case ids in rank order; `doc_ids()[i]` owns `chunks()[i]`.
    pub fn doc_ids(&self) -> Vec<CaseId> {
        self.hits.iter().map(|h| h.chunk.case_id).collect()
    }
}
