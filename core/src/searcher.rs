use crate::boolean;
use crate::index::DocId;
use crate::pipeline::TokenPipeline;
use crate::query;
use crate::rank::{self, RankMode, ScoredDoc, DEFAULT_ALPHA};
use crate::store::{Snapshot, SnapshotStore};
use std::sync::Arc;

/// How a query is evaluated: structured AND/OR/NOT retrieval, or vector-space
/// ranking over the flat token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Boolean,
    Ranked(RankMode),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub mode: SearchMode,
    /// Cosine smoothing constant; unused by the other modes.
    pub alpha: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Ranked(RankMode::TfIdf),
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// What a query evaluates to: an ordered scored list in ranked mode, a
/// doc-id set in boolean mode. Rendering is the display layer's concern.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Ranked(Vec<ScoredDoc>),
    Boolean(Vec<DocId>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Ranked(hits) => hits.len(),
            SearchResults::Boolean(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-path facade: owns the snapshot store and the token pipeline, and
/// evaluates raw query strings against whichever snapshot is current.
pub struct Searcher {
    store: SnapshotStore,
    pipeline: Box<dyn TokenPipeline + Send + Sync>,
}

impl Searcher {
    pub fn new(pipeline: Box<dyn TokenPipeline + Send + Sync>) -> Self {
        Self {
            store: SnapshotStore::empty(),
            pipeline,
        }
    }

    pub fn with_snapshot(snapshot: Snapshot, pipeline: Box<dyn TokenPipeline + Send + Sync>) -> Self {
        Self {
            store: SnapshotStore::new(snapshot),
            pipeline,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.load()
    }

    /// Evaluate one query. A query against an empty snapshot returns an
    /// empty result, not an error.
    pub fn search(&self, raw: &str, opts: &SearchOptions) -> SearchResults {
        let snapshot = self.store.load();
        let source = snapshot.postings_source();
        match opts.mode {
            SearchMode::Boolean => {
                let parsed = query::parse_query(raw, self.pipeline.as_ref());
                tracing::debug!(
                    and = parsed.and_terms.len(),
                    or = parsed.or_terms.len(),
                    not = parsed.not_terms.len(),
                    "evaluating boolean query"
                );
                SearchResults::Boolean(boolean::evaluate(&parsed, source))
            }
            SearchMode::Ranked(mode) => {
                let tokens = self.pipeline.terms(raw);
                SearchResults::Ranked(rank::rank(
                    &tokens,
                    source,
                    snapshot.num_docs,
                    mode,
                    opts.alpha,
                ))
            }
        }
    }
}
