//! In-memory node store

use super::{NodeStore, StoredNode};
use crate::model::Hash;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A [`NodeStore`] that keeps everything in memory
///
/// Hashes agree with [`ObjectStore`](super::ObjectStore), so a tree flushed
/// to either has the same root hash.
#[derive(Default)]
pub struct MemoryStore {
    nodes: RwLock<HashMap<Hash, StoredNode>>,
    roots: RwLock<HashMap<String, Hash>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.nodes.read().len()
    }
}

impl NodeStore for MemoryStore {
    fn put_node(&self, node: &StoredNode) -> Result<Hash> {
        let hash = node.hash()?;
        self.nodes
            .write()
            .entry(hash)
            .or_insert_with(|| node.clone());
        Ok(hash)
    }

    fn get_node(&self, hash: &Hash) -> Result<StoredNode> {
        self.nodes
            .read()
            .get(hash)
            .cloned()
            .ok_or_else(|| Error::NotFound(hash.to_hex()))
    }

    fn contains_node(&self, hash: &Hash) -> bool {
        self.nodes.read().contains_key(hash)
    }

    fn root(&self, name: &str) -> Option<Hash> {
        self.roots.read().get(name).copied()
    }

    fn set_root(&self, name: &str, hash: Hash) {
        self.roots.write().insert(name.to_string(), hash);
    }

    fn remove_root(&self, name: &str) -> Option<Hash> {
        self.roots.write().remove(name)
    }

    fn roots(&self) -> Vec<(String, Hash)> {
        let mut roots: Vec<_> = self
            .roots
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        roots.sort();
        roots
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
