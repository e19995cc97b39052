use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DocId = u32;

/// One term's postings: total occurrence count across the collection plus a
/// per-document occurrence count, keyed by ascending doc id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermEntry {
    pub freq: u64,
    #[serde(rename = "postings_list")]
    pub postings: BTreeMap<DocId, u32>,
}

impl TermEntry {
    /// Number of distinct documents containing the term.
    pub fn doc_freq(&self) -> usize {
        self.postings.len()
    }

    /// Doc ids of the postings, ascending.
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.postings.keys().copied().collect()
    }
}

/// Term-to-postings mapping. Terms iterate and serialize in ascending
/// lexicographic order, so persisted indexes are reproducible byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    pub terms: BTreeMap<String, TermEntry>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.terms.get(term)
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TermEntry)> {
        self.terms.iter()
    }
}

/// Positional postings for one term: every 0-based token position at which the
/// term occurs in each document. `freq` counts occurrences, so it equals the
/// summed position-list lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionalEntry {
    pub freq: u64,
    #[serde(rename = "docIDs")]
    pub postings: BTreeMap<DocId, Vec<u32>>,
}

/// Position-recording variant of the inverted index, kept for future
/// phrase-adjacency checks. Boolean retrieval and ranking read occurrence
/// counts only and never consult positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionalIndex {
    pub terms: BTreeMap<String, PositionalEntry>,
}

impl PositionalIndex {
    pub fn get(&self, term: &str) -> Option<&PositionalEntry> {
        self.terms.get(term)
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }
}

/// Pre-shortened display view of one document, produced alongside the index
/// so the query side never re-loads the full collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedDoc {
    pub title: String,
    /// Truncated to 200 characters, with a trailing "..." when cut.
    pub content: String,
    pub url: String,
    /// Number of indexed tokens in the document.
    pub t_count: u32,
}

pub type RefinedDb = BTreeMap<DocId, RefinedDoc>;
