//! lexrag-vector
//!
//! Exact (brute-force) nearest-neighbor search over chunk embeddings and the
//! safetensors artifact it is persisted as.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod artifact;
pub mod index;

pub use artifact::{load_index, save_index};
pub use index::{Neighbor, VectorIndex};
