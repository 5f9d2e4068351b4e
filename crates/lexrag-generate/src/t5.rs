//! Seq2seq answer generation with a local T5-family checkpoint.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Mutex;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::t5::{Config as T5Config, T5ForConditionalGeneration};
use tokenizers::Tokenizer;

use lexrag_core::traits::Generator;
use lexrag_embed::tokenize::limit_length;

use crate::beam::{beam_search, GenerationParams, StepModel};
use crate::prompt::build_prompt;

/// Runs the decoder over the full prefix each step against a fixed encoder output.
struct T5Step<'a> {
    model: &'a mut T5ForConditionalGeneration,
    encoder_output: &'a Tensor,
    device: &'a Device,
}

impl StepModel for T5Step<'_> {
    fn next_token_logits(&mut self, prefix: &[u32]) -> Result<Vec<f32>> {
        let decoder_ids = Tensor::new(prefix, self.device)?.unsqueeze(0)?;
        let logits = self.model.decode(&decoder_ids, self.encoder_output)?;
        Ok(logits.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()?)
    }
}

pub struct T5Generator {
    // encode/decode need `&mut`, so concurrent callers take turns.
    model: Mutex<T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    params: GenerationParams,
    decoder_start_token: u32,
    eos_token: u32,
}

impl T5Generator {
    /// Loads `tokenizer.json`, `config.json` and `model.safetensors` from `model_dir`.
    pub fn load(model_dir: &Path, model_id: &str, params: GenerationParams, max_input_tokens: usize) -> Result<Self> {
        let device = lexrag_embed::select_device();
        tracing::info!(model = model_id, dir = %model_dir.display(), "loading generator model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        // Long contexts are cut before the trailing EOS, which stays.
        limit_length(&mut tokenizer, max_input_tokens)?;

        let config_path = model_dir.join("config.json");
        let mut config: T5Config = serde_json::from_str(
            &std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?,
        )
        .with_context(|| format!("parsing {}", config_path.display()))?;
        // Beam search re-feeds whole prefixes, which the KV cache does not expect.
        config.use_cache = false;

        let weights = model_dir.join("model.safetensors");
        // SAFETY: the weights file is not modified while the model is alive.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };
        let model = T5ForConditionalGeneration::load(vb, &config)?;

        let decoder_start_token = config.decoder_start_token_id.unwrap_or(config.pad_token_id) as u32;
        let eos_token = config.eos_token_id as u32;
        tracing::info!(model = model_id, num_beams = params.num_beams, max_length = params.max_length, "generator model loaded");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            device,
            model_id: model_id.to_string(),
            params,
            decoder_start_token,
            eos_token,
        })
    }

    fn answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = build_prompt(question, context);
        let enc = self.tokenizer.encode(prompt, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let input_ids = Tensor::new(enc.get_ids(), &self.device)?.unsqueeze(0)?;

        let tokens = {
            let mut model = self.model.lock().map_err(|_| anyhow!("generator model lock poisoned"))?;
            model.clear_kv_cache();
            let encoder_output = model.encode(&input_ids)?;
            let mut step = T5Step { model: &mut model, encoder_output: &encoder_output, device: &self.device };
            beam_search(&mut step, self.decoder_start_token, self.eos_token, &self.params)?
        };

        let text = self.tokenizer.decode(&tokens, true).map_err(|e| anyhow!("Detokenization failed: {}", e))?;
        Ok(text.trim().to_string())
    }
}

impl Generator for T5Generator {
    fn model_id(&self) -> &str { &self.model_id }

    fn generate(&self, question: &str, context: &str) -> lexrag_core::Result<String> {
        self.answer(question, context).map_err(lexrag_core::Error::generation)
    }
}
