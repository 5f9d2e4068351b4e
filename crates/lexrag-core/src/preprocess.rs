//! Corpus preprocessing: raw case CSV -> cleaned documents -> word chunks.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::types::{CaseId, Chunk, Document};

/// English stopword list (NLTK's `stopwords.words('english')`).
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

/// Lowercase, keep only `a-z` and whitespace, drop stopwords, single-space join.
pub fn clean_text(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    let stop = stopwords();
    lowered
        .split_whitespace()
        .filter(|w| !stop.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Consecutive slices of at most `max_words` words. Empty text yields no chunks.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if max_words == 0 {
        return Vec::new();
    }
    words.chunks(max_words).map(|w| w.join(" ")).collect()
}

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_words: 512 }
    }
}

#[derive(Debug, Deserialize)]
struct RawCaseRow {
    case_id: String,
    #[serde(default)]
    case_title: Option<String>,
    #[serde(default)]
    case_text: Option<String>,
}

#[derive(Default)]
pub struct Preprocessor {
    chunking_config: ChunkingConfig,
}

impl Preprocessor {
    pub fn new(chunking_config: ChunkingConfig) -> Self {
        Self { chunking_config }
    }

    /// Reads the raw dataset (`case_id`, `case_title`, `case_text`, ...) and
    /// cleans every case. Rows without text are dropped.
    pub fn load_raw_cases(&self, path: &Path) -> Result<Vec<Document>> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::CorruptData(format!("{}: {}", path.display(), e)))?;
        let mut documents = Vec::new();
        let mut dropped = 0usize;
        for row in reader.deserialize::<RawCaseRow>() {
            let row = row.map_err(|e| Error::CorruptData(format!("{}: {}", path.display(), e)))?;
            let Some(raw_text) = row.case_text.filter(|t| !t.trim().is_empty()) else {
                dropped += 1;
                continue;
            };
            let case_id = parse_case_id(&row.case_id)?;
            let cleaned_text = clean_text(&raw_text);
            documents.push(Document {
                case_id,
                title: row.case_title.unwrap_or_default(),
                raw_text,
                cleaned_text,
            });
        }
        tracing::info!(path = %path.display(), cases = documents.len(), dropped, "raw cases preprocessed");
        Ok(documents)
    }

    /// Splits every document into chunks, in document order.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut all_chunks = Vec::new();
        for doc in documents {
            let pieces = chunk_words(&doc.cleaned_text, self.chunking_config.max_words);
            if pieces.is_empty() {
                tracing::warn!(case_id = doc.case_id, "document has no text after cleaning");
            }
            all_chunks.extend(pieces.into_iter().map(|text| Chunk { text, case_id: doc.case_id }));
        }
        tracing::info!(documents = documents.len(), chunks = all_chunks.len(), "documents chunked");
        all_chunks
    }
}

/// Parses ids like `Case1234` (or a bare `1234`).
pub fn parse_case_id(raw: &str) -> Result<CaseId> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("Case").unwrap_or(trimmed).trim();
    digits
        .parse::<CaseId>()
        .map_err(|_| Error::CorruptData(format!("invalid case id '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_digits_punctuation_and_stopwords() {
        let cleaned = clean_text("The Court, in 2002, awarded INDEMNITY costs!");
        assert_eq!(cleaned, "court awarded indemnity costs");
    }

    #[test]
    fn chunk_words_respects_max_and_preserves_words() {
        let text = "a1 b2 c3 d4 e5";
        let chunks = chunk_words("one two three four five", 2);
        assert_eq!(chunks, vec!["one two", "three four", "five"]);
        assert_eq!(chunks.join(" "), "one two three four five");
        assert!(chunk_words("   ", 3).is_empty());
        assert_eq!(chunk_words(text, 10).len(), 1);
    }

    #[test]
    fn case_ids_parse_with_and_without_prefix() {
        assert_eq!(parse_case_id("Case42").unwrap(), 42);
        assert_eq!(parse_case_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_case_id("CaseX"), Err(Error::CorruptData(_))));
    }
}
