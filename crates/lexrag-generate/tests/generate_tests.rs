use lexrag_core::config::GeneratorSettings;
use lexrag_core::Error;
use lexrag_generate::{build_prompt, generator_from_settings, resolve_model_dir, GenerationParams};
use tempfile::TempDir;

#[test]
fn prompt_layout() {
    let p = build_prompt("When are indemnity costs awarded?", "costs follow the event");
    assert_eq!(p, "Question: When are indemnity costs awarded?\nContext: costs follow the event\nAnswer:");
}

#[test]
fn params_follow_settings() {
    let settings = GeneratorSettings { num_beams: 2, max_length: 50, ..GeneratorSettings::default() };
    let params = GenerationParams::from(&settings);
    assert_eq!(params.num_beams, 2);
    assert_eq!(params.max_length, 50);
    assert_eq!(params.no_repeat_ngram_size, 3);
    assert!(params.early_stopping);
}

#[test]
fn configured_model_dir_wins() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("weights/t5")).unwrap();
    let settings = GeneratorSettings { model_dir: Some("weights/t5".to_string()), ..GeneratorSettings::default() };
    let dir = resolve_model_dir(&settings, tmp.path()).expect("resolve");
    assert_eq!(dir, tmp.path().join("weights/t5"));
}

#[test]
fn missing_model_dir_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let settings = GeneratorSettings {
        model: "acme/no-such-model".to_string(),
        model_dir: Some("nowhere".to_string()),
        ..GeneratorSettings::default()
    };
    let err = generator_from_settings(&settings, tmp.path()).err().expect("should fail");
    assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
}
