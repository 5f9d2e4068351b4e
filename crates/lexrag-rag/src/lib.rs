//! lexrag-rag
//!
//! The retrieval-augmented answer pipeline: retriever, context assembly,
//! orchestration, artifact building and the composition root that loads it
//! all from configuration.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod context;
pub mod ingest;
pub mod pipeline;
pub mod retriever;
pub mod system;

pub use context::{join_chunks, ContextAssembler};
pub use ingest::build_artifacts;
pub use pipeline::{Answer, RagPipeline};
pub use retriever::Retriever;
pub use system::{RagSystem, RetrievalSystem};
