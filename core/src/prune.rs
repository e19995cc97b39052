use crate::index::InvertedIndex;
use std::collections::HashSet;

/// Return a copy of the index with the `x` highest-document-frequency terms
/// removed. Candidates are ordered by descending document frequency, ties by
/// ascending term, so reruns remove the same terms. `x == 0` is a no-op copy;
/// `x` past the term count empties the index.
pub fn prune_top_terms(index: &InvertedIndex, x: usize) -> InvertedIndex {
    if x == 0 {
        return index.clone();
    }

    let mut candidates: Vec<(&String, usize)> = index
        .iter()
        .map(|(term, entry)| (term, entry.doc_freq()))
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let doomed: HashSet<&String> = candidates.iter().take(x).map(|&(term, _)| term).collect();
    let pruned = InvertedIndex {
        terms: index
            .terms
            .iter()
            .filter(|(term, _)| !doomed.contains(term))
            .map(|(term, entry)| (term.clone(), entry.clone()))
            .collect(),
    };

    tracing::debug!(
        removed = index.num_terms() - pruned.num_terms(),
        remaining = pruned.num_terms(),
        "pruned high-frequency terms"
    );
    pruned
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
    fn zero_is_a_noop() {
        let index = scenario_index();
        assert_eq!(prune_top_terms(&index, 0), index);
    }

    #[test]
    fn removes_highest_document_frequency_first() {
        let index = scenario_index();
        // beta has df 2, alpha and gamma df 1
        let pruned = prune_top_terms(&index, 1);
        assert!(pruned.get("beta").is_none());
        assert!(pruned.get("alpha").is_some());
        assert!(pruned.get("gamma").is_some());
    }

    #[test]
    fn ties_break_lexicographically() {
        let index = scenario_index();
        // after beta, alpha and gamma tie on df 1; alpha goes first
        let pruned = prune_top_terms(&index, 2);
        assert!(pruned.get("alpha").is_none());
        assert_eq!(pruned.num_terms(), 1);
        assert!(pruned.get("gamma").is_some());
    }

    #[test]
    fn oversized_x_empties_the_index() {
        let index = scenario_index();
        assert!(prune_top_terms(&index, 99).is_empty());
    }

    #[test]
    fn pruning_is_deterministic() {
        let index = scenario_index();
        assert_eq!(prune_top_terms(&index, 2), prune_top_terms(&index, 2));
    }

    #[test]
    fn surviving_terms_stay_sorted() {
        let pruned = prune_top_terms(&scenario_index(), 1);
        let terms: Vec<&String> = pruned.terms.keys().collect();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
    }
}
