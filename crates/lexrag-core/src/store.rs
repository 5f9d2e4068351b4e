//! Immutable chunk-index -> (chunk text, owning case id) mapping.
//!
//! Chunks are held as one ordered `Vec<Chunk>`, so text and owner can never
//! drift apart. The on-disk artifact keeps the two parallel lists the
//! preprocessing stage emits; they are zipped (and length-checked) on load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{CaseId, Chunk};

/// Serialized form of the documents artifact.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentsArtifact {
    chunks: Vec<String>,
    doc_ids: Vec<CaseId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkStore {
    chunks: Vec<Chunk>,
}

impl ChunkStore {
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Zips two parallel lists; fails with `CorruptData` if their lengths differ.
    pub fn from_parallel(texts: Vec<String>, doc_ids: Vec<CaseId>) -> Result<Self> {
        if texts.len() != doc_ids.len() {
            return Err(Error::CorruptData(format!(
                "documents artifact holds {} chunks but {} doc ids",
                texts.len(),
                doc_ids.len()
            )));
        }
        let chunks = texts.into_iter().zip(doc_ids).map(|(text, case_id)| Chunk { text, case_id }).collect();
        Ok(Self { chunks })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::from_io_at(e, path))?;
        let artifact: DocumentsArtifact = serde_json::from_str(&raw)
            .map_err(|e| Error::CorruptData(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_parallel(artifact.chunks, artifact.doc_ids)?;
        tracing::info!(path = %path.display(), chunks = store.len(), "chunk store loaded");
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let (chunks, doc_ids) = self.chunks.iter().map(|c| (c.text.clone(), c.case_id)).unzip();
        let artifact = DocumentsArtifact { chunks, doc_ids };
        let json = serde_json::to_string(&artifact)
            .map_err(|e| Error::CorruptData(format!("serialize documents artifact: {e}")))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&Chunk> {
        self.chunks.get(index).ok_or(Error::OutOfRange { index, len: self.chunks.len() })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }
}
