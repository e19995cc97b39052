use crate::pipeline::TokenPipeline;
use std::collections::BTreeSet;

/// A raw query string broken into required, optional, and excluded terms.
/// A term never appears in more than one set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub and_terms: BTreeSet<String>,
    pub or_terms: BTreeSet<String>,
    pub not_terms: BTreeSet<String>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.and_terms.is_empty() && self.or_terms.is_empty() && self.not_terms.is_empty()
    }
}

/// Parse a raw query string.
///
/// Grammar: double-quoted text is a mandatory phrase group whose terms all
/// join `and_terms` (co-occurrence only; adjacency is never checked, even
/// when a positional index exists). In the remaining text `!` excludes a
/// token, written attached (`!term`) or standalone (`! term`), and NOT wins
/// over AND for the same term. Every other surviving token joins `or_terms`.
/// Stop words and empty stems are dropped everywhere, testing the stemmed
/// form.
pub fn parse_query(raw: &str, pipeline: &dyn TokenPipeline) -> ParsedQuery {
    let normalized = pipeline.normalize(raw);
    let (phrases, remainder) = split_phrases(&normalized);

    let mut query = ParsedQuery::default();
    for phrase in &phrases {
        for word in phrase.split_whitespace() {
            let stem = pipeline.stem(word);
            if stem.is_empty() || pipeline.is_stop_word(&stem) {
                continue;
            }
            query.and_terms.insert(stem);
        }
    }

    let mut exclude_next = false;
    let mut leftovers: Vec<String> = Vec::new();
    for token in remainder.split_whitespace() {
        let (word, excluded) = match token.strip_prefix('!') {
            Some("") => {
                exclude_next = true;
                continue;
            }
            Some(rest) => (rest, true),
            None => (token, exclude_next),
        };
        let stem = pipeline.stem(word);
        if excluded {
            // a trailing `!` with no next token is silently ignored
            exclude_next = false;
            if !stem.is_empty() && !pipeline.is_stop_word(&stem) {
                query.and_terms.remove(&stem);
                query.not_terms.insert(stem);
            }
        } else if !stem.is_empty() && !pipeline.is_stop_word(&stem) {
            leftovers.push(stem);
        }
    }

    for stem in leftovers {
        if !query.and_terms.contains(&stem) && !query.not_terms.contains(&stem) {
            query.or_terms.insert(stem);
        }
    }
    query
}

/// Split out double-quoted phrase groups, returning them plus the remaining
/// text. An unpaired quote leaves its tail in the remainder as plain terms.
fn split_phrases(text: &str) -> (Vec<String>, String) {
    let mut phrases = Vec::new();
    let mut remainder = String::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in text.chars() {
        match ch {
            '"' if in_quote => {
                phrases.push(std::mem::take(&mut current));
                in_quote = false;
            }
            '"' => in_quote = true,
            _ if in_quote => current.push(ch),
            _ => remainder.push(ch),
        }
    }
    if in_quote {
        remainder.push(' ');
        remainder.push_str(&current);
    }
    (phrases, remainder)
}
