//! Shared fixtures for the unit tests.

use crate::corpus::{Corpus, Document};
use crate::pipeline::TokenPipeline;
use std::collections::BTreeMap;

/// Pipeline that passes text through untouched: whitespace tokens, identity
/// stems, no stop words. Keeps expected counts obvious in tests.
pub(crate) struct IdentityPipeline;

impl TokenPipeline for IdentityPipeline {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn stem(&self, token: &str) -> String {
        token.to_string()
    }

    fn is_stop_word(&self, _term: &str) -> bool {
        false
    }
}

pub(crate) fn doc(title: &str, content: &str, url: &str) -> Document {
    Document {
        title: title.to_string(),
        content: content.to_string(),
        url: url.to_string(),
    }
}

/// Two documents: doc 0 "alpha beta beta", doc 1 "beta gamma".
pub(crate) fn tiny_corpus() -> Corpus {
    let mut docs = BTreeMap::new();
    docs.insert(0, doc("A", "alpha beta beta", "u0"));
    docs.insert(1, doc("B", "beta gamma", "u1"));
    Corpus::new(docs)
}
