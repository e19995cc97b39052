use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Text-processing contract the engine indexes and queries through. The core
/// never depends on a concrete language pipeline, only on these operations.
pub trait TokenPipeline {
    /// Canonicalize raw text (case, unicode forms). Must not drop the query
    /// markers `"` and `!`.
    fn normalize(&self, text: &str) -> String;

    /// Split normalized text into an ordered token sequence.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Reduce a token to its canonical form; empty string if nothing remains.
    fn stem(&self, token: &str) -> String;

    fn is_stop_word(&self, term: &str) -> bool;

    /// Full chain: normalize, tokenize, drop stop words, stem, drop empty
    /// stems. This is the token stream the index builder and ranker consume.
    fn terms(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize(text);
        let mut out = Vec::new();
        for token in self.tokenize(&normalized) {
            if self.is_stop_word(&token) {
                continue;
            }
            let stem = self.stem(&token);
            if stem.is_empty() || self.is_stop_word(&stem) {
                continue;
            }
            out.push(stem);
        }
        out
    }
}

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// English pipeline: NFKC normalization + lowercase, regex word extraction,
/// a static stop-word set, and Snowball stemming.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPipeline;

impl EnglishPipeline {
    pub fn new() -> Self {
        Self
    }
}

impl TokenPipeline for EnglishPipeline {
    fn normalize(&self, text: &str) -> String {
        text.nfkc().collect::<String>().to_lowercase()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        WORD_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn stem(&self, token: &str) -> String {
        STEMMER.stem(token).to_string()
    }

    fn is_stop_word(&self, term: &str) -> bool {
        STOPWORDS.contains(term)
    }
}
