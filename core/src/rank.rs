//! Vector-space ranking over the flat stemmed query tokens. An independent
//! retrieval strategy, not composed with boolean evaluation.

use crate::boolean::union;
use crate::index::{DocId, InvertedIndex};
use std::collections::BTreeSet;

/// Smoothing constant for cosine mode.
pub const DEFAULT_ALPHA: f32 = 0.001;

/// TF-IDF sums base-10 tf/idf products per query token; cosine compares
/// natural-log idf query weights against base-10 tf document weights. The
/// base mismatch between the two is deliberate; they are independent
/// formulas, not one shared weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMode {
    TfIdf,
    Cosine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f32,
}

/// Score every document containing at least one query term (index
/// elimination) and return the full candidate list ordered by descending
/// score, ties by ascending doc id. Truncating for display is the caller's
/// concern. `num_docs` is the collection size N, not the candidate count.
pub fn rank(
    tokens: &[String],
    index: &InvertedIndex,
    num_docs: usize,
    mode: RankMode,
    alpha: f32,
) -> Vec<ScoredDoc> {
    let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();

    let mut candidates: Vec<DocId> = Vec::new();
    for term in &distinct {
        if let Some(entry) = index.get(term) {
            candidates = union(&candidates, &entry.doc_ids());
        }
    }

    let mut scored: Vec<ScoredDoc> = candidates
        .into_iter()
        .map(|doc_id| {
            let score = match mode {
                RankMode::TfIdf => tf_idf_score(tokens, index, num_docs, doc_id),
                RankMode::Cosine => cosine_score(&distinct, index, num_docs, doc_id, alpha),
            };
            ScoredDoc { doc_id, score }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    scored
}

/// Σ log10(1 + tf) · log10(N / df) over the query tokens, repeats included.
/// Tokens absent from the index, or whose postings were reduced to nothing,
/// contribute zero.
fn tf_idf_score(tokens: &[String], index: &InvertedIndex, num_docs: usize, doc_id: DocId) -> f32 {
    let mut score = 0.0f32;
    for token in tokens {
        if let Some(entry) = index.get(token) {
            let df = entry.doc_freq();
            if df == 0 {
                continue;
            }
            let count = entry.postings.get(&doc_id).copied().unwrap_or(0);
            let tf = (1.0 + count as f32).log10();
            let idf = (num_docs as f32 / df as f32).log10();
            score += tf * idf;
        }
    }
    score
}

/// Cosine over one component per distinct query term. Query component
/// ln(N / (1 + df)) + alpha (alpha alone for unknown terms), document
/// component log10(1 + tf) + alpha. The extra alpha in the denominator keeps
/// it nonzero.
fn cosine_score(
    distinct: &BTreeSet<&str>,
    index: &InvertedIndex,
    num_docs: usize,
    doc_id: DocId,
    alpha: f32,
) -> f32 {
    let mut dot = 0.0f32;
    let mut q_norm = 0.0f32;
    let mut d_norm = 0.0f32;

    for term in distinct {
        let entry = index.get(term);
        let q = match entry {
            Some(e) => (num_docs as f32 / (1.0 + e.doc_freq() as f32)).ln() + alpha,
            None => alpha,
        };
        let count = entry
            .and_then(|e| e.postings.get(&doc_id))
            .copied()
            .unwrap_or(0);
        let d = (1.0 + count as f32).log10() + alpha;

        dot += q * d;
        q_norm += q * q;
        d_norm += d * d;
    }
    dot / (d_norm.sqrt() * q_norm.sqrt() + alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_index;
    use crate::testing::{tiny_corpus, IdentityPipeline};

    fn scenario_index() -> InvertedIndex {
        build_index(&tiny_corpus(), &IdentityPipeline).index
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn tf_idf_zero_scores_tie_break_by_doc_id() {
        // beta occurs in both docs, so idf = log10(2/2) = 0 and both score 0
        let ranked = rank(&tokens(&["beta"]), &scenario_index(), 2, RankMode::TfIdf, DEFAULT_ALPHA);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].doc_id, 0);
        assert_eq!(ranked[1].doc_id, 1);
        assert_eq!(ranked[0].score, 0.0);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn tf_idf_scores_only_candidates() {
        let ranked = rank(&tokens(&["alpha"]), &scenario_index(), 2, RankMode::TfIdf, DEFAULT_ALPHA);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].doc_id, 0);
        let expected = (1.0f32 + 1.0).log10() * (2.0f32 / 1.0).log10();
        assert!((ranked[0].score - expected).abs() < 1e-6);
    }

    #[test]
    fn repeated_query_tokens_add_repeated_contributions() {
        let index = scenario_index();
        let once = rank(&tokens(&["alpha"]), &index, 2, RankMode::TfIdf, DEFAULT_ALPHA);
        let twice = rank(&tokens(&["alpha", "alpha"]), &index, 2, RankMode::TfIdf, DEFAULT_ALPHA);
        assert!((twice[0].score - 2.0 * once[0].score).abs() < 1e-6);
    }

    #[test]
    fn unknown_tokens_produce_no_candidates() {
        let ranked = rank(&tokens(&["zeta"]), &scenario_index(), 2, RankMode::TfIdf, DEFAULT_ALPHA);
        assert!(ranked.is_empty());
    }

    #[test]
    fn higher_tf_ranks_higher() {
        // beta's idf is 0 (df == N), so only gamma separates the docs
        let ranked = rank(
            &tokens(&["beta", "gamma"]),
            &scenario_index(),
            2,
            RankMode::TfIdf,
            DEFAULT_ALPHA,
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].doc_id, 1);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn cosine_matches_the_hand_computed_formula() {
        let ranked = rank(&tokens(&["beta"]), &scenario_index(), 2, RankMode::Cosine, DEFAULT_ALPHA);
        assert_eq!(ranked.len(), 2);

        // one component per doc: q = ln(2/3) + α, d = log10(1 + tf) + α
        let q = (2.0f32 / 3.0).ln() + DEFAULT_ALPHA;
        let score = |tf: f32| {
            let d = (1.0f32 + tf).log10() + DEFAULT_ALPHA;
            (q * d) / (d.abs() * q.abs() + DEFAULT_ALPHA)
        };
        let by_doc: Vec<(DocId, f32)> = ranked.iter().map(|s| (s.doc_id, s.score)).collect();
        for (doc_id, got) in by_doc {
            let tf = if doc_id == 0 { 2.0 } else { 1.0 };
            assert!((got - score(tf)).abs() < 1e-5);
        }
    }

    #[test]
    fn cosine_equal_scores_tie_break_by_doc_id() {
        // alpha and gamma are symmetric across the two docs
        let ranked = rank(
            &tokens(&["alpha", "gamma"]),
            &scenario_index(),
            2,
            RankMode::Cosine,
            DEFAULT_ALPHA,
        );
        assert_eq!(ranked.len(), 2);
        assert!((ranked[0].score - ranked[1].score).abs() < 1e-6);
        assert_eq!(ranked[0].doc_id, 0);
        assert_eq!(ranked[1].doc_id, 1);
    }

    #[test]
    fn empty_index_ranks_nothing() {
        let ranked = rank(&tokens(&["beta"]), &InvertedIndex::new(), 0, RankMode::TfIdf, DEFAULT_ALPHA);
        assert!(ranked.is_empty());
    }
}
