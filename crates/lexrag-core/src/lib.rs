//! lexrag-core
//!
//! Domain types, the error taxonomy, collaborator traits, configuration, the
//! chunk store, the corpus table and preprocessing shared by every lexrag crate.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod preprocess;
pub mod store;
pub mod traits;
pub mod types;

pub use corpus::Corpus;
pub use error::{Error, Result};
pub use store::ChunkStore;
pub use traits::{DocumentLookup, Embedder, Generator};
pub use types::{CaseId, Chunk, ContextPolicy, Document, Metric, RetrievalResult, RetrievedChunk};
