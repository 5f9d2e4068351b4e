//! Shared plumbing for the lexrag binaries.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

use lexrag_core::{Corpus, RetrievalResult};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays clean for answers. `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// One line per hit: rank, case id, title, distance, then the chunk text.
pub fn print_hits(result: &RetrievalResult, corpus: &Corpus) {
    for (rank, hit) in result.hits.iter().enumerate() {
        let title = corpus.title(hit.chunk.case_id).unwrap_or("<unknown case>");
        println!("{:>2}. [Case{}] {} (distance {:.4})", rank + 1, hit.chunk.case_id, title, hit.distance);
        println!("    {}", preview(&hit.chunk.text, 300));
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
