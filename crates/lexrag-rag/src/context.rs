//! Turns retrieved chunks into the generator's context string.

use std::collections::HashSet;
use std::sync::Arc;

use lexrag_core::{CaseId, ContextPolicy, DocumentLookup, Error, Result, RetrievalResult};

#[derive(Clone, Default)]
pub struct ContextAssembler {
    documents: Option<Arc<dyn DocumentLookup>>,
}

impl ContextAssembler {
    /// Chunk concatenation only; see [`ContextAssembler::with_documents`].
    pub fn new() -> Self {
        Self { documents: None }
    }

    pub fn with_documents(documents: Arc<dyn DocumentLookup>) -> Self {
        Self { documents: Some(documents) }
    }

    /// Full-document assembly needs a document lookup.
    pub fn supports(&self, policy: ContextPolicy) -> bool {
        match policy {
            ContextPolicy::ChunkConcat => true,
            ContextPolicy::FullDocument => self.documents.is_some(),
        }
    }

    /// `chunks[i]` is owned by `doc_ids[i]`. An empty retrieval gives an empty string.
    ///
    /// Fails with `InvalidArgument` for a policy this assembler does not [`support`](Self::supports).
    pub fn assemble<S: AsRef<str>>(&self, chunks: &[S], doc_ids: &[CaseId], policy: ContextPolicy) -> Result<String> {
        match (policy, &self.documents) {
            (ContextPolicy::ChunkConcat, _) => Ok(join_chunks(chunks)),
            (ContextPolicy::FullDocument, Some(documents)) => Ok(join_documents(documents.as_ref(), doc_ids)),
            (ContextPolicy::FullDocument, None) => Err(Error::InvalidArgument(
                "full-document context requires a document lookup".to_string(),
            )),
        }
    }

    pub fn assemble_result(&self, result: &RetrievalResult, policy: ContextPolicy) -> Result<String> {
        self.assemble(&result.chunks(), &result.doc_ids(), policy)
    }
}

/// Cleaned text of each distinct owner, first-seen order; unknown ids are skipped.
fn join_documents(documents: &dyn DocumentLookup, doc_ids: &[CaseId]) -> String {
    let mut seen = HashSet::new();
    doc_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| documents.document(*id))
        .map(|doc| doc.cleaned_text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Single-space join in rank order.
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexrag_core::{Corpus, Document};

    fn doc(case_id: CaseId, cleaned: &str) -> Document {
        Document { case_id, title: format!("case {case_id}"), raw_text: String::new(), cleaned_text: cleaned.to_string() }
    }

    #[test]
    fn chunk_concat_ignores_ids() {
        let a = ContextAssembler::new();
        let chunks = ["indemnity costs", "apparent bias"];
        assert_eq!(a.assemble(&chunks, &[1, 2], ContextPolicy::ChunkConcat).unwrap(), "indemnity costs apparent bias");
        assert_eq!(a.assemble(&chunks, &[9, 9], ContextPolicy::ChunkConcat).unwrap(), "indemnity costs apparent bias");
    }

    #[test]
    fn empty_retrieval_is_empty_context() {
        let none: [&str; 0] = [];
        assert_eq!(ContextAssembler::new().assemble(&none, &[], ContextPolicy::ChunkConcat).unwrap(), "");
        let corpus = Corpus::from_documents(vec![doc(1, "first case")]).unwrap();
        let with_docs = ContextAssembler::with_documents(Arc::new(corpus));
        assert_eq!(with_docs.assemble(&none, &[], ContextPolicy::FullDocument).unwrap(), "");
    }

    #[test]
    fn full_document_dedups_in_first_seen_order_and_skips_unknown() {
        let corpus = Corpus::from_documents(vec![doc(1, "first case"), doc(2, "second case")]).unwrap();
        let a = ContextAssembler::with_documents(Arc::new(corpus));
        let chunks = ["x", "y", "z", "w"];
        assert_eq!(a.assemble(&chunks, &[2, 1, 2, 7], ContextPolicy::FullDocument).unwrap(), "second case first case");
    }

    #[test]
    fn full_document_without_lookup_is_rejected() {
        let a = ContextAssembler::new();
        assert!(!a.supports(ContextPolicy::FullDocument));
        assert!(a.supports(ContextPolicy::ChunkConcat));
        let err = a.assemble(&["indemnity costs"], &[1], ContextPolicy::FullDocument).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
    }
}
