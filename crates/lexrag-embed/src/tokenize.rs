//! Batch tokenization for the sentence embedder.

use anyhow::{anyhow, bail, Result};
use tokenizers::{PostProcessor, Tokenizer, TruncationParams};

/// Caps encodings at `max_len` tokens. Special tokens are counted inside the
/// budget, so a long text still ends with `[SEP]` like a short one.
pub fn limit_length(tokenizer: &mut Tokenizer, max_len: usize) -> Result<()> {
    let special = tokenizer.get_post_processor().map_or(0, |p| p.added_tokens(false));
    if max_len <= special {
        bail!("max_len {} leaves no room beside {} special tokens", max_len, special);
    }
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(|e| anyhow!("Invalid truncation for max_len {}: {}", max_len, e))?;
    Ok(())
}

/// Row-major token ids and attention mask for a batch, every row padded with
/// `pad_id` to the longest encoding. Returns `(ids, mask, width)`.
pub fn encode_padded(tokenizer: &Tokenizer, texts: &[String], pad_id: u32) -> Result<(Vec<u32>, Vec<u32>, usize)> {
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let width = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0).max(1);

    let mut ids = Vec::with_capacity(texts.len() * width);
    let mut mask = Vec::with_capacity(texts.len() * width);
    for enc in &encodings {
        ids.extend_from_slice(enc.get_ids());
        mask.extend_from_slice(enc.get_attention_mask());
        ids.resize(ids.len() + width - enc.get_ids().len(), pad_id);
        mask.resize(mask.len() + width - enc.get_attention_mask().len(), 0);
    }
    Ok((ids, mask, width))
}
