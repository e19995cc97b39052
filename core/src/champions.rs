use crate::index::{DocId, InvertedIndex, TermEntry};
use serde::{Deserialize, Serialize};

/// Size-bounded postings subset used as a drop-in substitute for the full
/// index on the read path. Retrieval through it is approximate: a document
/// can miss every term's sublist individually and still belong in the true
/// top-k of a multi-term query.
///
/// The wrapper exists so a champions list can only be built from the full
/// index; rebuilding from an already-reduced structure is a type error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChampionsList {
    index: InvertedIndex,
}

impl ChampionsList {
    pub fn as_index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn num_terms(&self) -> usize {
        self.index.num_terms()
    }
}

/// Build a champions list from the full index. Per term: if the postings
/// count exceeds `x`, keep the `x` entries with the highest occurrence count
/// (ties by ascending doc id) and recompute `freq` over the kept entries;
/// otherwise copy the entry unchanged. One pass, full replacement.
pub fn build_champions(full: &InvertedIndex, x: usize) -> ChampionsList {
    let mut index = InvertedIndex::new();
    for (term, entry) in full.iter() {
        let kept = if entry.doc_freq() > x {
            let mut ranked: Vec<(DocId, u32)> =
                entry.postings.iter().map(|(&d, &c)| (d, c)).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(x);
            let postings: std::collections::BTreeMap<DocId, u32> = ranked.into_iter().collect();
            let freq = postings.values().map(|&c| u64::from(c)).sum();
            TermEntry { freq, postings }
        } else {
            entry.clone()
        };
        index.terms.insert(term.clone(), kept);
    }

    tracing::debug!(threshold = x, num_terms = index.num_terms(), "built champions list");
    ChampionsList { index }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_index;
    use crate::testing::{tiny_corpus, IdentityPipeline};

    fn scenario_index() -> InvertedIndex {
        build_index(&tiny_corpus(), &IdentityPipeline).index
    }

    #[test]
    fn threshold_one_keeps_highest_count_posting() {
        let champions = build_champions(&scenario_index(), 1);
        let beta = champions.as_index().get("beta").unwrap();
        assert_eq!(beta.postings.len(), 1);
        assert_eq!(beta.postings.get(&0), Some(&2));
        assert_eq!(beta.freq, 2);
    }

    #[test]
    fn terms_at_or_below_threshold_are_unchanged() {
        let full = scenario_index();
        let champions = build_champions(&full, 1);
        assert_eq!(champions.as_index().get("alpha"), full.get("alpha"));
        assert_eq!(champions.as_index().get("gamma"), full.get("gamma"));
    }

    #[test]
    fn champion_postings_are_a_subset_of_the_full_postings() {
        let full = scenario_index();
        for x in 0..4 {
            let champions = build_champions(&full, x);
            for (term, kept) in champions.as_index().iter() {
                let entry = full.get(term).unwrap();
                for (doc_id, count) in &kept.postings {
                    assert_eq!(entry.postings.get(doc_id), Some(count));
                }
            }
        }
    }

    #[test]
    fn count_ties_break_by_ascending_doc_id() {
        let mut full = InvertedIndex::new();
        let entry = full.terms.entry("delta".into()).or_default();
        entry.postings.insert(3, 5);
        entry.postings.insert(1, 5);
        entry.postings.insert(2, 7);
        entry.freq = 17;

        let champions = build_champions(&full, 2);
        let kept = champions.as_index().get("delta").unwrap();
        let ids: Vec<u32> = kept.doc_ids();
        // doc 2 wins on count; docs 1 and 3 tie, lower id kept
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(kept.freq, 12);
    }

    #[test]
    fn threshold_zero_empties_every_posting_list() {
        let champions = build_champions(&scenario_index(), 0);
        assert_eq!(champions.num_terms(), 3);
        for (_, entry) in champions.as_index().iter() {
            assert!(entry.postings.is_empty());
            assert_eq!(entry.freq, 0);
        }
    }
}
