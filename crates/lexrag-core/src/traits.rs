use crate::error::{Error, Result};
use crate::types::{CaseId, Document};

/// Text-to-vector collaborator. Implementations must be deterministic.
pub trait Embedder: Send + Sync {
    /// Stable identifier of the underlying model.
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embeds a single text, checking that exactly one vector of `dim()` comes back.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()])?;
        if vectors.len() != 1 {
            return Err(Error::EmbeddingFailure(format!(
                "expected 1 vector, embedder returned {}",
                vectors.len()
            )));
        }
        let vector = vectors.remove(0);
        if vector.len() != self.dim() {
            return Err(Error::EmbeddingFailure(format!(
                "expected {} components, embedder returned {}",
                self.dim(),
                vector.len()
            )));
        }
        Ok(vector)
    }
}

/// Answer-producing collaborator.
pub trait Generator: Send + Sync {
    fn model_id(&self) -> &str;
    fn generate(&self, question: &str, context: &str) -> Result<String>;
}

/// Case-id keyed access to full documents.
pub trait DocumentLookup: Send + Sync {
    fn document(&self, case_id: CaseId) -> Option<&Document>;
}
