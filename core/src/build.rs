//! Batch construction of the inverted index and its sibling artifacts.

use crate::corpus::Corpus;
use crate::index::{InvertedIndex, PositionalIndex, RefinedDb, RefinedDoc};
use crate::pipeline::TokenPipeline;

/// Maximum refined-content length, in characters.
const REFINED_CONTENT_CHARS: usize = 200;

/// Everything one pass over the corpus produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    pub index: InvertedIndex,
    pub refined: RefinedDb,
}

/// Build the inverted index and the refined display view in a single pass
/// over the corpus, processing documents in ascending doc-id order. The
/// builder performs no I/O and cannot fail once a corpus exists; loading the
/// corpus is where a build aborts as a whole.
pub fn build_index(corpus: &Corpus, pipeline: &dyn TokenPipeline) -> BuildOutput {
    let mut index = InvertedIndex::new();
    let mut refined = RefinedDb::new();

    for (doc_id, doc) in corpus.iter() {
        let terms = pipeline.terms(&doc.content);
        refined.insert(
            doc_id,
            RefinedDoc {
                title: doc.title.clone(),
                content: truncate_content(&doc.content, REFINED_CONTENT_CHARS),
                url: doc.url.clone(),
                t_count: terms.len() as u32,
            },
        );
        for term in terms {
            let entry = index.terms.entry(term).or_default();
            entry.freq += 1;
            *entry.postings.entry(doc_id).or_insert(0) += 1;
        }
    }

    tracing::debug!(
        num_docs = corpus.len(),
        num_terms = index.num_terms(),
        "built inverted index"
    );
    BuildOutput { index, refined }
}

/// Build the positional variant: same traversal as [`build_index`], but each
/// posting stores the ordered 0-based positions of the term in the document.
/// The position counter resets per document and counts emitted terms, i.e.
/// positions are assigned after stop-word and empty-stem filtering.
pub fn build_positional(corpus: &Corpus, pipeline: &dyn TokenPipeline) -> PositionalIndex {
    let mut index = PositionalIndex::default();

    for (doc_id, doc) in corpus.iter() {
        for (position, term) in pipeline.terms(&doc.content).into_iter().enumerate() {
            let entry = index.terms.entry(term).or_default();
            entry.freq += 1;
            entry
                .postings
                .entry(doc_id)
                .or_default()
                .push(position as u32);
        }
    }

    tracing::debug!(num_terms = index.num_terms(), "built positional index");
    index
}

fn truncate_content(content: &str, max_chars: usize) -> String {
    if content.chars().count() > max_chars {
        let mut short: String = content.chars().take(max_chars).collect();
        short.push_str("...");
        short
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tiny_corpus, IdentityPipeline};

    #[test]
    fn counts_match_the_token_streams() {
        let out = build_index(&tiny_corpus(), &IdentityPipeline);
        let index = &out.index;
        assert_eq!(index.num_terms(), 3);

        let alpha = index.get("alpha").unwrap();
        assert_eq!(alpha.freq, 1);
        assert_eq!(alpha.postings.get(&0), Some(&1));

        let beta = index.get("beta").unwrap();
        assert_eq!(beta.freq, 3);
        assert_eq!(beta.doc_freq(), 2);
        assert_eq!(beta.postings.get(&0), Some(&2));
        assert_eq!(beta.postings.get(&1), Some(&1));

        let gamma = index.get("gamma").unwrap();
        assert_eq!(gamma.freq, 1);
        assert_eq!(gamma.postings.get(&1), Some(&1));
    }

    #[test]
    fn freq_equals_sum_of_postings() {
        let out = build_index(&tiny_corpus(), &IdentityPipeline);
        for (_, entry) in out.index.iter() {
            let total: u64 = entry.postings.values().map(|&c| u64::from(c)).sum();
            assert_eq!(entry.freq, total);
            assert_eq!(entry.doc_freq(), entry.postings.len());
        }
    }

    #[test]
    fn terms_are_sorted_after_build() {
        let out = build_index(&tiny_corpus(), &IdentityPipeline);
        let terms: Vec<&String> = out.index.terms.keys().collect();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
    }

    #[test]
    fn refined_records_token_counts_and_views() {
        let out = build_index(&tiny_corpus(), &IdentityPipeline);
        let d0 = out.refined.get(&0).unwrap();
        assert_eq!(d0.title, "A");
        assert_eq!(d0.content, "alpha beta beta");
        assert_eq!(d0.url, "u0");
        assert_eq!(d0.t_count, 3);
        let d1 = out.refined.get(&1).unwrap();
        assert_eq!(d1.t_count, 2);
    }

    #[test]
    fn refined_content_truncates_past_200_chars() {
        assert_eq!(truncate_content(&"x".repeat(200), 200), "x".repeat(200));
        let long = "y".repeat(201);
        let short = truncate_content(&long, 200);
        assert_eq!(short.chars().count(), 203);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn positional_positions_reset_per_document() {
        let index = build_positional(&tiny_corpus(), &IdentityPipeline);
        let beta = index.get("beta").unwrap();
        assert_eq!(beta.freq, 3);
        assert_eq!(beta.postings.get(&0), Some(&vec![1, 2]));
        assert_eq!(beta.postings.get(&1), Some(&vec![0]));
        let gamma = index.get("gamma").unwrap();
        assert_eq!(gamma.postings.get(&1), Some(&vec![1]));
    }

    #[test]
    fn empty_corpus_builds_empty_artifacts() {
        let out = build_index(&Corpus::default(), &IdentityPipeline);
        assert!(out.index.is_empty());
        assert!(out.refined.is_empty());
    }
}
