use scour_core::pipeline::{EnglishPipeline, TokenPipeline};

#[test]
fn it_normalizes_and_stems() {
    let pipeline = EnglishPipeline::new();
    let terms = pipeline.terms("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(terms.contains(&"run".to_string()));
    // Accented words survive normalization with the possessive stripped
    assert!(terms.iter().any(|t| t.starts_with("caf")));
}

#[test]
fn it_filters_stopwords() {
    let pipeline = EnglishPipeline::new();
    let terms = pipeline.terms("The quick brown fox and the lazy dog");
    assert!(!terms.contains(&"the".to_string()));
    assert!(!terms.contains(&"and".to_string()));
}

#[test]
fn it_drops_empty_stems() {
    let pipeline = EnglishPipeline::new();
    for term in pipeline.terms("alpha  beta") {
        assert!(!term.is_empty());
    }
}
