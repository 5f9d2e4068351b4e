//! On-disk form of the vector index: a safetensors file with one rank-2
//! `f32` tensor named `embeddings`, shape `(N, D)`.
//!
//! The metric is not stored; it comes from configuration and must match
//! the one the embeddings were produced for.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use lexrag_core::{Error, Metric, Result};

use crate::index::VectorIndex;

pub const EMBEDDINGS_TENSOR: &str = "embeddings";

pub fn save_index(index: &VectorIndex, path: &Path) -> Result<()> {
    let tensor = Tensor::from_vec(index.as_flat().to_vec(), (index.len(), index.dim()), &Device::Cpu)
        .map_err(|e| Error::IndexFailure(e.to_string()))?;
    let mut tensors = HashMap::new();
    tensors.insert(EMBEDDINGS_TENSOR.to_string(), tensor);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    candle_core::safetensors::save(&tensors, path).map_err(|e| Error::IndexFailure(e.to_string()))?;
    tracing::info!(path = %path.display(), rows = index.len(), dim = index.dim(), "vector index saved");
    Ok(())
}

pub fn load_index(path: &Path, metric: Metric) -> Result<VectorIndex> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let corrupt = |e: candle_core::Error| Error::CorruptData(format!("{}: {}", path.display(), e));
    let tensors = candle_core::safetensors::load(path, &Device::Cpu).map_err(corrupt)?;
    let tensor = tensors
        .get(EMBEDDINGS_TENSOR)
        .ok_or_else(|| Error::CorruptData(format!("{}: no '{EMBEDDINGS_TENSOR}' tensor", path.display())))?;
    let (len, dim) = tensor.dims2().map_err(corrupt)?;
    let data = tensor
        .to_dtype(DType::F32)
        .and_then(|t| t.flatten_all())
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(corrupt)?;
    let index = VectorIndex::from_flat(data, len, dim, metric)?;
    tracing::info!(path = %path.display(), rows = len, dim, %metric, "vector index loaded");
    Ok(index)
}
