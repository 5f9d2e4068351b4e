use anyhow::Result;
use clap::Parser;

use lexrag_core::config::Config;
use lexrag_rag::RagSystem;

const SAMPLE_QUESTIONS: [&str; 3] = [
    "What criteria are used to assess apparent bias in judicial decisions as outlined in Johnson v Johnson and Sydney Refractive Surgery Centre Pty Ltd v Federal Commissioner of Taxation?",
    "Under what circumstances can a court issue cost orders without proceeding to trial, according to Australian Securities Commission v Aust-Home Investments Limited?",
    "When are indemnity costs awarded instead of party and party costs in court proceedings, based on Alpine Hardwood Pty Ltd v Hardys Pty Ltd?",
];

/// Answer legal questions from the indexed case corpus.
#[derive(Parser, Debug)]
#[command(name = "lexrag-ask", version)]
struct Args {
    /// Questions to answer; runs a few sample questions when omitted
    questions: Vec<String>,

    /// Chunks retrieved per question (defaults to `retrieval.top_k`)
    #[arg(long, short = 'k')]
    top_k: Option<usize>,
}

fn main() -> Result<()> {
    lexrag_cli::init_tracing();
    let args = Args::parse();
    let config = Config::load()?;
    let top_k = args.top_k.unwrap_or(config.settings().retrieval.top_k);

    let system = RagSystem::load(&config)?;
    let questions: Vec<String> = if args.questions.is_empty() {
        SAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        args.questions
    };

    for question in &questions {
        let answer = system.pipeline.answer_with_sources(question, top_k)?;
        println!("Question: {question}");
        println!("Answer: {}", answer.text);
        println!("Sources:");
        lexrag_cli::print_hits(&answer.retrieved, &system.corpus);
        println!("{}", "-".repeat(80));
    }
    Ok(())
}
