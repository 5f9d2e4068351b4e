use std::fs;

use lexrag_core::config::Config;
use lexrag_core::preprocess::{ChunkingConfig, Preprocessor};
use lexrag_core::{ChunkStore, Chunk, ContextPolicy, Corpus, DocumentLookup, Error, Metric};
use tempfile::TempDir;

#[test]
fn chunk_store_round_trips_all_pairs() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("documents.json");
    let pairs = vec![
        Chunk::new("indemnity costs awarded special feature", 11),
        Chunk::new("apparent bias fair minded observer", 22),
        Chunk::new("cost orders without trial", 11),
    ];
    ChunkStore::from_chunks(pairs.clone()).save(&path).unwrap();

    let store = ChunkStore::load(&path).expect("load");
    assert_eq!(store.len(), pairs.len());
    for (i, expected) in pairs.iter().enumerate() {
        assert_eq!(store.get(i).unwrap(), expected);
    }
}

#[test]
fn chunk_store_get_past_end_is_out_of_range() {
    let store = ChunkStore::from_chunks(vec![Chunk::new("a", 1), Chunk::new("b", 2)]);
    assert!(matches!(store.get(2), Err(Error::OutOfRange { index: 2, len: 2 })));
    assert!(matches!(store.get(usize::MAX), Err(Error::OutOfRange { .. })));
}

#[test]
fn mismatched_parallel_lists_are_rejected_at_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("documents.json");
    let chunks: Vec<String> = (0..10).map(|i| format!("chunk {i}")).collect();
    let doc_ids: Vec<i64> = (0..9).collect();
    fs::write(&path, serde_json::json!({ "chunks": chunks, "doc_ids": doc_ids }).to_string()).unwrap();

    assert!(matches!(ChunkStore::load(&path), Err(Error::CorruptData(_))));
}

#[test]
fn missing_and_malformed_artifacts() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.json");
    assert!(matches!(ChunkStore::load(&missing), Err(Error::NotFound(_))));

    let garbage = tmp.path().join("garbage.json");
    fs::write(&garbage, "{ not json").unwrap();
    assert!(matches!(ChunkStore::load(&garbage), Err(Error::CorruptData(_))));
}

#[test]
fn raw_csv_is_cleaned_and_chunked() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("raw.csv");
    fs::write(
        &path,
        "case_id,case_outcome,case_title,case_text\n\
         Case1,cited,Alpine Hardwood v Hardys,\"Indemnity costs require a special or unusual feature.\"\n\
         Case2,cited,Empty Case,\n\
         Case3,applied,Johnson v Johnson,\"The test for apparent bias is well-known.\"\n",
    )
    .unwrap();

    let processor = Preprocessor::new(ChunkingConfig { max_words: 2 });
    let docs = processor.load_raw_cases(&path).expect("load raw");
    assert_eq!(docs.len(), 2, "row without text is dropped");
    assert_eq!(docs[0].case_id, 1);
    assert_eq!(docs[0].cleaned_text, "indemnity costs require special unusual feature");

    let chunks = processor.chunk_documents(&docs);
    let first_doc: Vec<&str> = chunks.iter().filter(|c| c.case_id == 1).map(|c| c.text.as_str()).collect();
    assert_eq!(first_doc.join(" "), docs[0].cleaned_text);
    assert!(chunks.iter().all(|c| c.text.split_whitespace().count() <= 2));
}

#[test]
fn corpus_table_round_trips_and_looks_up_by_id() {
    let tmp = TempDir::new().unwrap();
    let raw = tmp.path().join("raw.csv");
    fs::write(&raw, "case_id,case_title,case_text\nCase5,Spencer v ACCC,\"Costs when a proceeding has not gone to trial.\"\n").unwrap();
    let docs = Preprocessor::default().load_raw_cases(&raw).unwrap();

    let path = tmp.path().join("corpus.csv");
    Corpus::from_documents(docs).unwrap().save(&path).unwrap();
    let corpus = Corpus::load(&path).expect("load corpus");
    assert_eq!(corpus.len(), 1);
    assert_eq!(corpus.title(5), Some("Spencer v ACCC"));
    assert_eq!(corpus.document(5).unwrap().cleaned_text, "costs proceeding gone trial");
    assert!(corpus.document(6).is_none());
}

#[test]
fn duplicate_case_ids_are_corrupt() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("corpus.csv");
    fs::write(&path, "case_id,case_title,cleaned_text\n1,a,x\n1,b,y\n").unwrap();
    assert!(matches!(Corpus::load(&path), Err(Error::CorruptData(_))));
}

#[test]
fn config_layers_toml_over_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[retrieval]\ntop_k = 8\nmetric = \"inner-product\"\ncontext_policy = \"full-document\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[chunking]\nmax_words = 128\n").unwrap();

    let config = Config::load_from(tmp.path(), "test").expect("config");
    let s = config.settings();
    assert_eq!(s.retrieval.top_k, 8);
    assert_eq!(s.retrieval.metric, Metric::InnerProduct);
    assert_eq!(s.retrieval.context_policy, ContextPolicy::FullDocument);
    assert_eq!(s.chunking.max_words, 128);
    assert_eq!(s.generator.num_beams, 4);
    assert_eq!(config.get::<usize>("retrieval.top_k").unwrap(), 8);
    assert_eq!(config.path("artifacts/index.safetensors"), tmp.path().join("artifacts/index.safetensors"));
}

#[test]
fn config_rejects_zero_top_k() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[retrieval]\ntop_k = 0\n").unwrap();
    assert!(matches!(Config::load_from(tmp.path(), "test"), Err(Error::InvalidConfig(_))));
}

#[test]
fn config_accepts_only_canonical_enum_names() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[retrieval]\nmetric = \"ip\"\n").unwrap();
    assert!(matches!(Config::load_from(tmp.path(), "test"), Err(Error::InvalidConfig(_))));

    fs::write(tmp.path().join("config.toml"), "[retrieval]\ncontext_policy = \"documents\"\n").unwrap();
    assert!(matches!(Config::load_from(tmp.path(), "test"), Err(Error::InvalidConfig(_))));

    assert_eq!(Metric::InnerProduct.to_string(), "inner-product");
}
