use std::sync::Arc;

use lexrag_core::{ContextPolicy, Error, Generator, RetrievalResult, Result};

use crate::context::ContextAssembler;
use crate::retriever::Retriever;

/// A generated answer together with the retrieval that grounded it.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub retrieved: RetrievalResult,
}

/// retrieve -> assemble -> generate, sequentially, once per call.
///
/// Holds already-loaded collaborators; constructing a pipeline never loads a model.
#[derive(Clone)]
pub struct RagPipeline {
    retriever: Retriever,
    assembler: ContextAssembler,
    generator: Arc<dyn Generator>,
    policy: ContextPolicy,
    default_top_k: usize,
}

impl RagPipeline {
    pub fn new(retriever: Retriever, assembler: ContextAssembler, generator: Arc<dyn Generator>) -> Self {
        Self { retriever, assembler, generator, policy: ContextPolicy::ChunkConcat, default_top_k: 5 }
    }

    /// Fails with `InvalidArgument` if the assembler cannot serve `policy`.
    pub fn with_policy(mut self, policy: ContextPolicy) -> Result<Self> {
        if !self.assembler.supports(policy) {
            return Err(Error::InvalidArgument(format!(
                "context policy {policy:?} needs a document lookup"
            )));
        }
        self.policy = policy;
        Ok(self)
    }

    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }

    pub fn answer(&self, question: &str, top_k: usize) -> Result<String> {
        self.answer_with_sources(question, top_k).map(|a| a.text)
    }

    pub fn answer_default(&self, question: &str) -> Result<String> {
        self.answer(question, self.default_top_k)
    }

    /// Generator output is returned as-is; an empty context is still generated from.
    pub fn answer_with_sources(&self, question: &str, top_k: usize) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(Error::InvalidArgument("question must not be empty".to_string()));
        }
        let retrieved = self.retriever.retrieve(question, top_k)?;
        let context = self.assembler.assemble_result(&retrieved, self.policy)?;
        tracing::debug!(hits = retrieved.len(), context_chars = context.len(), policy = ?self.policy, "context assembled");
        let text = self.generator.generate(question, &context)?;
        Ok(Answer { text, retrieved })
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn policy(&self) -> ContextPolicy {
        self.policy
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }
}
