pub mod boolean;
pub mod build;
pub mod champions;
pub mod corpus;
pub mod index;
pub mod persist;
pub mod pipeline;
pub mod prune;
pub mod query;
pub mod rank;
pub mod searcher;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use champions::ChampionsList;
pub use corpus::{Corpus, Document};
pub use index::{DocId, InvertedIndex, PositionalEntry, PositionalIndex, RefinedDb, RefinedDoc, TermEntry};
pub use query::ParsedQuery;
pub use rank::{RankMode, ScoredDoc, DEFAULT_ALPHA};
pub use searcher::{SearchMode, SearchOptions, SearchResults, Searcher};
pub use store::{Snapshot, SnapshotStore};
