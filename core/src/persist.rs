//! JSON persistence for every index artifact. `meta.json` is the publish
//! marker: the indexer writes it last, and loading requires it first, so a
//! crashed half-build is never served.

use crate::champions::ChampionsList;
use crate::index::{InvertedIndex, PositionalIndex, RefinedDb};
use crate::store::Snapshot;
use anyhow::{ensure, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const INDEX_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildMeta {
    pub num_docs: usize,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn index(&self) -> PathBuf {
        self.root.join("index.json")
    }
    pub fn positional(&self) -> PathBuf {
        self.root.join("positional.json")
    }
    pub fn refined(&self) -> PathBuf {
        self.root.join("refined.json")
    }
    pub fn champions(&self) -> PathBuf {
        self.root.join("champions.json")
    }
    pub fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

fn write_json<T: Serialize>(path: &Path, what: &str, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating index directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {} to {}", what, path.display()))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {} from {}", what, path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed {} in {}", what, path.display()))
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    write_json(&paths.index(), "inverted index", index)
}

pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    read_json(&paths.index(), "inverted index")
}

pub fn save_positional(paths: &IndexPaths, index: &PositionalIndex) -> Result<()> {
    write_json(&paths.positional(), "positional index", index)
}

pub fn load_positional(paths: &IndexPaths) -> Result<PositionalIndex> {
    read_json(&paths.positional(), "positional index")
}

pub fn save_refined(paths: &IndexPaths, refined: &RefinedDb) -> Result<()> {
    write_json(&paths.refined(), "refined db", refined)
}

pub fn load_refined(paths: &IndexPaths) -> Result<RefinedDb> {
    read_json(&paths.refined(), "refined db")
}

pub fn save_champions(paths: &IndexPaths, champions: &ChampionsList) -> Result<()> {
    write_json(&paths.champions(), "champions list", champions)
}

pub fn load_champions(paths: &IndexPaths) -> Result<ChampionsList> {
    read_json(&paths.champions(), "champions list")
}

pub fn save_meta(paths: &IndexPaths, meta: &BuildMeta) -> Result<()> {
    write_json(&paths.meta(), "build metadata", meta)
}

pub fn load_meta(paths: &IndexPaths) -> Result<BuildMeta> {
    read_json(&paths.meta(), "build metadata")
}

/// The champions builder copies postings verbatim from its input index, so a
/// term or posting the current index cannot back means the list was built
/// against an earlier index and must not be served.
fn ensure_champions_match(champions: &ChampionsList, index: &InvertedIndex) -> Result<()> {
    for (term, entry) in champions.as_index().iter() {
        let full = index.get(term).with_context(|| {
            format!("champions list covers term {term:?} missing from the index")
        })?;
        for (doc_id, count) in &entry.postings {
            ensure!(
                full.postings.get(doc_id) == Some(count),
                "champions posting {doc_id} for term {term:?} disagrees with the index"
            );
        }
    }
    Ok(())
}

/// Load a complete read-only snapshot from disk. Fails when no published
/// index exists or when the artifacts disagree with the metadata; the
/// positional index is an offline artifact and is not loaded. The champions
/// list is optional, but when present it must agree with the loaded index.
pub fn load_snapshot(paths: &IndexPaths) -> Result<Snapshot> {
    let meta = load_meta(paths).context("no index available (run the indexer first)")?;
    let index = load_index(paths)?;
    let refined = load_refined(paths)?;
    ensure!(
        meta.num_docs == refined.len(),
        "metadata expects {} documents but the refined db holds {}",
        meta.num_docs,
        refined.len()
    );
    ensure!(
        meta.num_terms == index.num_terms(),
        "metadata expects {} terms but the index holds {}",
        meta.num_terms,
        index.num_terms()
    );

    let mut snapshot = Snapshot::new(index, refined);
    if paths.champions().exists() {
        let champions = load_champions(paths)?;
        ensure_champions_match(&champions, &snapshot.index)?;
        snapshot = snapshot.with_champions(champions);
    }
    tracing::debug!(
        num_docs = snapshot.num_docs,
        num_terms = snapshot.index.num_terms(),
        champions = snapshot.champions.is_some(),
        "loaded snapshot"
    );
    Ok(snapshot)
}
