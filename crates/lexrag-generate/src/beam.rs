//! Model-agnostic beam search decoding.
//!
//! A [`StepModel`] maps a decoder prefix to next-token logits; everything
//! else (log-softmax, n-gram blocking, beam bookkeeping, stopping) lives here.
//! Hypothesis scores are summed log-probabilities, normalized by sequence
//! length when hypotheses are compared at the end.

use anyhow::Result;

use lexrag_core::config::GeneratorSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    /// Upper bound on decoder length, counting the start token.
    pub max_length: usize,
    pub num_beams: usize,
    /// 0 disables n-gram blocking.
    pub no_repeat_ngram_size: usize,
    /// Stop as soon as `num_beams` hypotheses have finished.
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self { max_length: 200, num_beams: 4, no_repeat_ngram_size: 3, early_stopping: true }
    }
}

impl From<&GeneratorSettings> for GenerationParams {
    fn from(s: &GeneratorSettings) -> Self {
        Self {
            max_length: s.max_length,
            num_beams: s.num_beams,
            no_repeat_ngram_size: s.no_repeat_ngram_size,
            early_stopping: s.early_stopping,
        }
    }
}

pub trait StepModel {
    /// Logits over the vocabulary for the token following `prefix`.
    fn next_token_logits(&mut self, prefix: &[u32]) -> Result<Vec<f32>>;
}

#[derive(Debug, Clone)]
struct Hypothesis {
    tokens: Vec<u32>,
    score: f32,
}

pub fn log_softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![f32::NEG_INFINITY; logits.len()];
    }
    let log_sum = logits.iter().map(|&x| (x - max).exp()).sum::<f32>().ln();
    logits.iter().map(|&x| x - max - log_sum).collect()
}

/// Tokens that would complete an n-gram already present in `seq`.
pub fn banned_tokens(seq: &[u32], n: usize) -> Vec<u32> {
    if n == 0 || seq.len() + 1 < n {
        return Vec::new();
    }
    let prefix = &seq[seq.len() + 1 - n..];
    seq.windows(n)
        .filter(|w| &w[..n - 1] == prefix)
        .map(|w| w[n - 1])
        .collect()
}

fn top_indices(values: &[f32], k: usize) -> Vec<usize> {
    let by_value_desc = |a: &usize, b: &usize| values[*b].total_cmp(&values[*a]).then(a.cmp(b));
    let mut idx: Vec<usize> = (0..values.len()).collect();
    if k < idx.len() && k > 0 {
        idx.select_nth_unstable_by(k - 1, by_value_desc);
        idx.truncate(k);
    }
    idx.sort_by(by_value_desc);
    idx
}

fn push_finished(finished: &mut Vec<(Vec<u32>, f32)>, tokens: Vec<u32>, score: f32, keep: usize) {
    finished.push((tokens, score));
    finished.sort_by(|a, b| b.1.total_cmp(&a.1));
    finished.truncate(keep);
}

/// Decodes from `start_token` until `eos_token` or `max_length`.
///
/// Returns the generated tokens without the start token and without EOS.
/// With `num_beams == 1` this reduces to greedy decoding.
pub fn beam_search<M: StepModel>(model: &mut M, start_token: u32, eos_token: u32, params: &GenerationParams) -> Result<Vec<u32>> {
    let width = params.num_beams.max(1);
    let mut running = vec![Hypothesis { tokens: vec![start_token], score: 0.0 }];
    let mut finished: Vec<(Vec<u32>, f32)> = Vec::new();
    let mut done = false;

    while !running.is_empty() && running[0].tokens.len() < params.max_length {
        let mut candidates: Vec<(usize, u32, f32)> = Vec::new();
        for (beam, hyp) in running.iter().enumerate() {
            let logits = model.next_token_logits(&hyp.tokens)?;
            let mut logp = log_softmax(&logits);
            for token in banned_tokens(&hyp.tokens, params.no_repeat_ngram_size) {
                if let Some(x) = logp.get_mut(token as usize) {
                    *x = f32::NEG_INFINITY;
                }
            }
            for token in top_indices(&logp, 2 * width) {
                if logp[token].is_finite() {
                    candidates.push((beam, token as u32, hyp.score + logp[token]));
                }
            }
        }
        candidates.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)).then(a.1.cmp(&b.1)));

        let mut next = Vec::with_capacity(width);
        for (rank, (beam, token, score)) in candidates.into_iter().enumerate() {
            let parent = &running[beam];
            if token == eos_token {
                // Only EOS within the top `width` candidates may close a hypothesis.
                if rank < width {
                    let len = parent.tokens.len() as f32;
                    push_finished(&mut finished, parent.tokens[1..].to_vec(), score / len, width);
                }
                continue;
            }
            let mut tokens = parent.tokens.clone();
            tokens.push(token);
            next.push(Hypothesis { tokens, score });
            if next.len() == width {
                break;
            }
        }
        running = next;

        if finished.len() >= width {
            if params.early_stopping {
                done = true;
                break;
            }
            let worst_finished = finished.iter().map(|f| f.1).fold(f32::INFINITY, f32::min);
            let best_running = running
                .first()
                .map_or(f32::NEG_INFINITY, |h| h.score / h.tokens.len() as f32);
            if best_running <= worst_finished {
                done = true;
                break;
            }
        }
    }

    if !done {
        for hyp in running {
            let len = hyp.tokens.len() as f32;
            push_finished(&mut finished, hyp.tokens[1..].to_vec(), hyp.score / len, width);
        }
    }

    // `finished` is kept sorted best-first.
    Ok(finished.into_iter().next().map(|(tokens, _)| tokens).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: u32 = 0;
    const EOS: u32 = 1;

    struct Scripted<F: FnMut(&[u32]) -> Vec<f32>>(F);

    impl<F: FnMut(&[u32]) -> Vec<f32>> StepModel for Scripted<F> {
        fn next_token_logits(&mut self, prefix: &[u32]) -> Result<Vec<f32>> {
            Ok((self.0)(prefix))
        }
    }

    fn dist(probs: [f32; 4]) -> Vec<f32> {
        probs.iter().map(|p| if *p == 0.0 { f32::NEG_INFINITY } else { p.ln() }).collect()
    }

    fn params(num_beams: usize, max_length: usize, ngram: usize, early_stopping: bool) -> GenerationParams {
        GenerationParams { max_length, num_beams, no_repeat_ngram_size: ngram, early_stopping }
    }

    /// Greedy takes token 2 first; the better joint sequence starts with 3.
    fn trap(prefix: &[u32]) -> Vec<f32> {
        match prefix {
            [START] => dist([0.0, 0.1, 0.5, 0.4]),
            [START, 2] => dist([0.0, 0.4, 0.3, 0.3]),
            [START, 3] => dist([0.0, 0.9, 0.05, 0.05]),
            _ => dist([0.0, 0.9, 0.05, 0.05]),
        }
    }

    #[test]
    fn greedy_follows_argmax_until_eos() {
        let mut model = Scripted(|p: &[u32]| match p.len() {
            1 => dist([0.0, 0.1, 0.8, 0.1]),
            2 => dist([0.0, 0.1, 0.1, 0.8]),
            _ => dist([0.0, 0.8, 0.1, 0.1]),
        });
        let out = beam_search(&mut model, START, EOS, &params(1, 20, 0, true)).unwrap();
        assert_eq!(out, vec![2, 3]);
    }

    #[test]
    fn beam_search_escapes_greedy_trap() {
        let greedy = beam_search(&mut Scripted(trap), START, EOS, &params(1, 20, 0, true)).unwrap();
        assert_eq!(greedy, vec![2]);
        let beam = beam_search(&mut Scripted(trap), START, EOS, &params(2, 20, 0, true)).unwrap();
        assert_eq!(beam, vec![3]);
        let patient = beam_search(&mut Scripted(trap), START, EOS, &params(2, 20, 0, false)).unwrap();
        assert_eq!(patient, vec![3]);
    }

    #[test]
    fn max_length_bounds_output() {
        let mut model = Scripted(|_: &[u32]| dist([0.0, 0.0, 0.9, 0.1]));
        let out = beam_search(&mut model, START, EOS, &params(2, 6, 0, true)).unwrap();
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn repeated_ngrams_are_blocked() {
        let mut model = Scripted(|_: &[u32]| dist([0.0, 0.0, 0.6, 0.4]));
        let out = beam_search(&mut model, START, EOS, &params(1, 5, 2, true)).unwrap();
        assert_eq!(out, vec![2, 2, 3, 2]);
    }

    #[test]
    fn banned_tokens_match_completed_ngrams() {
        assert_eq!(banned_tokens(&[5, 6, 7, 5, 6], 3), vec![7]);
        assert!(banned_tokens(&[5, 6], 3).is_empty());
        assert!(banned_tokens(&[5, 5, 5], 0).is_empty());
        assert_eq!(banned_tokens(&[4, 9], 1), vec![4, 9]);
    }

    #[test]
    fn log_softmax_normalizes() {
        let lp = log_softmax(&[1.0, 2.0, 3.0]);
        let total: f32 = lp.iter().map(|x| x.exp()).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(lp[2] > lp[1] && lp[1] > lp[0]);
    }
}
