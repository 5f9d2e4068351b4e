//! Sentence embeddings from a local BERT checkpoint (all-MiniLM-L6-v2 family).
//!
//! Tokenize -> BERT forward -> attention-masked mean pooling -> L2 normalize,
//! the same recipe sentence-transformers applies for these models.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use lexrag_core::traits::Embedder;

use crate::pool::masked_mean_l2;
use crate::select_device;
use crate::tokenize::{encode_padded, limit_length};

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    dim: usize,
    pad_id: u32,
}

impl BertEmbedder {
    /// Loads `tokenizer.json`, `config.json` and `model.safetensors`
    /// (or `pytorch_model.bin`) from `model_dir`.
    pub fn load(model_dir: &Path, model_id: &str, max_len: usize) -> Result<Self> {
        let device = select_device();
        tracing::info!(model = model_id, dir = %model_dir.display(), "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let pad_id = tokenizer.get_padding().map(|p| p.pad_id).unwrap_or(0);

        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(
            &std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?,
        )
        .with_context(|| format!("parsing {}", config_path.display()))?;

        let safetensors = model_dir.join("model.safetensors");
        let vb = if safetensors.exists() {
            // SAFETY: the weights file is not modified while the model is alive.
            unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, &device)? }
        } else {
            let weights_path = model_dir.join("pytorch_model.bin");
            let weights = candle_core::pickle::read_all(&weights_path)
                .with_context(|| format!("reading {}", weights_path.display()))?;
            let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
            VarBuilder::from_tensors(weights_map, DType::F32, &device)
        };
        let model = BertModel::load(vb, &config)?;
        let max_len = max_len.min(config.max_position_embeddings);
        limit_length(&mut tokenizer, max_len)?;
        tracing::info!(model = model_id, dim = config.hidden_size, max_len, "embedding model loaded");

        Ok(Self { model, tokenizer, device, model_id: model_id.to_string(), dim: config.hidden_size, pad_id })
    }

    /// Token ids and attention mask for a batch, both `[B, T]`.
    fn encode_batch(&self, texts: &[String]) -> Result<(Tensor, Tensor)> {
        let (ids, mask, width) = encode_padded(&self.tokenizer, texts, self.pad_id)?;
        let shape = (texts.len(), width);
        Ok((Tensor::from_vec(ids, shape, &self.device)?, Tensor::from_vec(mask, shape, &self.device)?))
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let (input_ids, attention_mask) = self.encode_batch(texts)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_dtype(DType::F32)?.to_vec2::<f32>()?)
    }
}

impl Embedder for BertEmbedder {
    fn model_id(&self) -> &str { &self.model_id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> lexrag_core::Result<Vec<Vec<f32>>> {
        self.embed_texts(texts).map_err(lexrag_core::Error::embedding)
    }
}
