use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use lexrag_core::config::Config;
use lexrag_core::preprocess::{ChunkingConfig, Preprocessor};
use lexrag_core::Corpus;
use lexrag_embed::embedder_from_settings;
use lexrag_rag::build_artifacts;
use lexrag_vector::save_index;

/// Preprocess the raw case CSV, then embed and write the retrieval artifacts.
#[derive(Parser, Debug)]
#[command(name = "lexrag-build", version)]
struct Args {
    /// Raw dataset CSV (defaults to `data.raw_csv_path`)
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Where to write the preprocessed corpus CSV (defaults to `data.corpus_path`)
    #[arg(long)]
    preprocessed: Option<PathBuf>,
}

fn main() -> Result<()> {
    lexrag_cli::init_tracing();
    let args = Args::parse();
    let config = Config::load()?;
    let settings = config.settings();

    let raw_path = args.raw.unwrap_or_else(|| config.path(&settings.data.raw_csv_path));
    let corpus_path = args.preprocessed.unwrap_or_else(|| config.path(&settings.data.corpus_path));
    let documents_path = config.path(&settings.data.documents_path);
    let index_path = config.path(&settings.data.index_path);

    let preprocessor = Preprocessor::new(ChunkingConfig { max_words: settings.chunking.max_words });
    let corpus = Corpus::from_documents(preprocessor.load_raw_cases(&raw_path)?)?;
    corpus.save(&corpus_path)?;
    println!("Preprocessed {} cases -> {}", corpus.len(), corpus_path.display());

    let embedder = embedder_from_settings(&settings.embedding, config.base_dir())?;
    let (store, index) = build_artifacts(
        corpus.documents(),
        settings.chunking.max_words,
        embedder.as_ref(),
        settings.embedding.batch_size,
        settings.retrieval.metric,
    )?;
    store.save(&documents_path)?;
    save_index(&index, &index_path)?;

    println!("Chunks:    {} -> {}", store.len(), documents_path.display());
    println!("Embedding: {} x {} ({}, {}) -> {}", index.len(), index.dim(), embedder.model_id(), index.metric(), index_path.display());
    Ok(())
}
