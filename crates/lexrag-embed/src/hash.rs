use std::hash::Hasher;
use twox_hash::XxHash64;

use lexrag_core::traits::Embedder;

/// Weight-free embedder: signed feature hashing of whitespace tokens, then
/// L2 normalization. Deterministic and fast; used for tests and dry runs.
pub struct HashEmbedder {
    dim: usize,
    model_id: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim, model_id: format!("hash:xxh64:d{dim}") }
    }

    /// Text without tokens maps to the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        if self.dim == 0 {
            return v;
        }
        for token in text.split_whitespace() {
            let h = token_hash(token);
            let bucket = (h % self.dim as u64) as usize;
            // Top bit picks the sign.
            v[bucket] += if h >> 63 == 0 { 1.0 } else { -1.0 };
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

fn token_hash(token: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(token.as_bytes());
    hasher.finish()
}

impl Embedder for HashEmbedder {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> lexrag_core::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
