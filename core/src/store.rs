//! Build-then-publish snapshot handling. Builders produce values; readers
//! only ever see whole snapshots, swapped atomically.

use crate::champions::ChampionsList;
use crate::index::{InvertedIndex, RefinedDb};
use parking_lot::RwLock;
use std::sync::Arc;

/// One published, read-only view of the engine's data. A snapshot is never
/// mutated after install; rebuilding anything produces a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub index: Arc<InvertedIndex>,
    pub champions: Option<Arc<ChampionsList>>,
    pub refined: Arc<RefinedDb>,
    /// Collection size N, used as the ranking denominator.
    pub num_docs: usize,
    pub champions_enabled: bool,
}

impl Snapshot {
    pub fn new(index: InvertedIndex, refined: RefinedDb) -> Self {
        let num_docs = refined.len();
        Self {
            index: Arc::new(index),
            champions: None,
            refined: Arc::new(refined),
            num_docs,
            champions_enabled: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_champions(mut self, champions: ChampionsList) -> Self {
        self.champions = Some(Arc::new(champions));
        self
    }

    /// The postings source queries read: the champions list when one is
    /// installed and enabled, the full index otherwise.
    pub fn postings_source(&self) -> &InvertedIndex {
        match (&self.champions, self.champions_enabled) {
            (Some(champions), true) => champions.as_index(),
            _ => &self.index,
        }
    }
}

/// Holds the current snapshot behind a lock that is only taken long enough
/// to clone or swap an `Arc`. Readers query entirely lock-free afterwards.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Publish a whole new snapshot. In-flight readers keep the one they
    /// already cloned.
    pub fn install(&self, snapshot: Snapshot) {
        *self.current.write() = Arc::new(snapshot);
        tracing::debug!("installed new snapshot");
    }

    /// Attach a champions list to the current snapshot. The unchanged
    /// structures are shared with the outgoing snapshot, not copied.
    pub fn install_champions(&self, champions: ChampionsList) {
        let mut current = self.current.write();
        let next = Snapshot {
            champions: Some(Arc::new(champions)),
            ..(**current).clone()
        };
        *current = Arc::new(next);
    }

    /// Flip the read path between champions list and full index. Neither
    /// structure is discarded; disabling reverts to the full index.
    pub fn set_champions_enabled(&self, enabled: bool) {
        let mut current = self.current.write();
        if current.champions_enabled == enabled {
            return;
        }
        let next = Snapshot {
            champions_enabled: enabled,
            ..(**current).clone()
        };
        *current = Arc::new(next);
    }

    pub fn champions_enabled(&self) -> bool {
        self.current.read().champions_enabled
    }
}
