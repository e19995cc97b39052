//! Sorted-postings merge algebra for boolean retrieval.

use crate::index::{DocId, InvertedIndex};
use crate::query::ParsedQuery;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Two-pointer intersection of sorted doc-id lists.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

/// Two-pointer union of sorted doc-id lists, emitting once on ties.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Evaluate a parsed query against one postings source in a single pass.
///
/// AND terms, when present, are intersected (shortest lists first, so the
/// intersection narrows fastest) and OR terms are ignored; otherwise OR terms
/// are unioned. A term missing from the index contributes an empty list, so
/// an absent AND term empties the whole intersection. The union of all NOT
/// terms' postings is then removed. With no AND and no OR terms the result
/// is empty regardless of NOT terms.
pub fn evaluate(query: &ParsedQuery, index: &InvertedIndex) -> Vec<DocId> {
    let postings =
        |term: &String| -> Vec<DocId> { index.get(term).map(|e| e.doc_ids()).unwrap_or_default() };

    let mut result = if !query.and_terms.is_empty() {
        let mut lists: Vec<Vec<DocId>> = query.and_terms.iter().map(postings).collect();
        lists.sort_by_key(Vec::len);
        let mut lists = lists.into_iter();
        let first = lists.next().unwrap_or_default();
        lists.fold(first, |acc, next| intersect(&acc, &next))
    } else if !query.or_terms.is_empty() {
        query
            .or_terms
            .iter()
            .map(postings)
            .fold(Vec::new(), |acc, next| union(&acc, &next))
    } else {
        return Vec::new();
    };

    if !query.not_terms.is_empty() {
        let mut excluded: HashSet<DocId> = HashSet::new();
        for term in &query.not_terms {
            excluded.extend(postings(term));
        }
        result.retain(|doc_id| !excluded.contains(doc_id));
    }
    result
}
