use anyhow::Result;
use candle_core::Tensor;

/// Sentence-transformers pooling: mean over unmasked tokens, then unit L2 norm.
///
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]`; returns `[B, H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, tokens, _) = hidden.dims3()?;
    let mask = attention_mask
        .to_device(hidden.device())?
        .to_dtype(hidden.dtype())?
        .reshape((batch, tokens, 1))?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    // An all-padding row keeps a zero vector instead of dividing by zero.
    let counts = (mask.sum(1)? + 1e-9)?;
    let mean = summed.broadcast_div(&counts)?;
    let norm = (mean.sqr()?.sum_keepdim(1)?.sqrt()? + 1e-12)?;
    Ok(mean.broadcast_div(&norm)?)
}
