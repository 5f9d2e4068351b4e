use anyhow::Result;
use clap::Parser;

use lexrag_core::config::Config;
use lexrag_rag::RetrievalSystem;

/// Show the chunks nearest to a query, with their cases.
#[derive(Parser, Debug)]
#[command(name = "lexrag-retrieve", version)]
struct Args {
    /// Free-text query
    query: String,

    /// Number of chunks to return (defaults to `retrieval.top_k`)
    #[arg(long, short = 'k')]
    top_k: Option<usize>,
}

fn main() -> Result<()> {
    lexrag_cli::init_tracing();
    let args = Args::parse();
    let config = Config::load()?;
    let top_k = args.top_k.unwrap_or(config.settings().retrieval.top_k);

    let system = RetrievalSystem::load(&config)?;
    let result = system.retriever.retrieve(&args.query, top_k)?;

    println!("Query: {}", args.query);
    if result.is_empty() {
        println!("No results.");
        return Ok(());
    }
    lexrag_cli::print_hits(&result, &system.corpus);
    Ok(())
}
