//! Loading of the fixed document collection the index is built from.

use crate::index::DocId;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// The document collection, keyed by ascending doc id. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    docs: BTreeMap<DocId, Document>,
}

impl Corpus {
    pub fn new(docs: BTreeMap<DocId, Document>) -> Self {
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(&doc_id)
    }

    /// Documents in ascending doc-id order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.docs.iter().map(|(&id, doc)| (id, doc))
    }

    /// Load a collection file: a JSON object mapping doc-id strings to
    /// documents. Keys must parse as unsigned integers; anything else is a
    /// load failure, never a partially loaded corpus.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read collection from {}", path.display()))?;
        let entries: BTreeMap<String, Document> = serde_json::from_str(&raw)
            .with_context(|| format!("malformed collection JSON in {}", path.display()))?;
        let mut docs = BTreeMap::new();
        for (key, doc) in entries {
            let id: DocId = key.parse().with_context(|| {
                format!("document key {key:?} in {} is not a numeric id", path.display())
            })?;
            docs.insert(id, doc);
        }
        Ok(Self { docs })
    }

    /// Load and merge several collection files into one corpus. A doc id
    /// appearing in more than one file is a load failure.
    pub fn load_merged(paths: &[PathBuf]) -> Result<Self> {
        let mut docs: BTreeMap<DocId, Document> = BTreeMap::new();
        for path in paths {
            let part = Self::load(path)?;
            for (id, doc) in part.docs {
                if docs.insert(id, doc).is_some() {
                    bail!("duplicate document id {id} in {}", path.display());
                }
            }
        }
        Ok(Self { docs })
    }
}
