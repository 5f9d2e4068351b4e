//! Preprocessed corpus table: one row per case, keyed by `case_id`.
//!
//! Backs the full-document context policy and lets presentation layers show
//! case titles next to retrieved chunks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::traits::DocumentLookup;
use crate::types::{CaseId, Document};

#[derive(Debug, Serialize, Deserialize)]
struct CorpusRow {
    case_id: CaseId,
    case_title: String,
    #[serde(default)]
    case_text: Option<String>,
    cleaned_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    by_id: HashMap<CaseId, usize>,
}

impl Corpus {
    /// Fails with `CorruptData` if two documents share a case id.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(documents.len());
        for (pos, doc) in documents.iter().enumerate() {
            if by_id.insert(doc.case_id, pos).is_some() {
                return Err(Error::CorruptData(format!("duplicate case_id {}", doc.case_id)));
            }
        }
        Ok(Self { documents, by_id })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::CorruptData(format!("{}: {}", path.display(), e)))?;
        let mut documents = Vec::new();
        for row in reader.deserialize::<CorpusRow>() {
            let row = row.map_err(|e| Error::CorruptData(format!("{}: {}", path.display(), e)))?;
            documents.push(Document {
                case_id: row.case_id,
                title: row.case_title,
                raw_text: row.case_text.unwrap_or_default(),
                cleaned_text: row.cleaned_text,
            });
        }
        let corpus = Self::from_documents(documents)?;
        tracing::info!(path = %path.display(), cases = corpus.len(), "corpus table loaded");
        Ok(corpus)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
        for doc in &self.documents {
            writer
                .serialize(CorpusRow {
                    case_id: doc.case_id,
                    case_title: doc.title.clone(),
                    case_text: Some(doc.raw_text.clone()),
                    cleaned_text: doc.cleaned_text.clone(),
                })
                .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn title(&self, case_id: CaseId) -> Option<&str> {
        self.document(case_id).map(|d| d.title.as_str())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentLookup for Corpus {
    fn document(&self, case_id: CaseId) -> Option<&Document> {
        self.by_id.get(&case_id).map(|&pos| &self.documents[pos])
    }
}
