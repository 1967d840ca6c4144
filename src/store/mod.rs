//! Content-addressed node storage
//!
//! Trie nodes are written as [`StoredNode`]s addressed by the BLAKE3 hash of
//! their serialized form. A store also keeps a table of named roots, one per
//! persisted tree. Two backends are provided: [`ObjectStore`] (a single file,
//! zstd-compressed) and [`MemoryStore`].

mod blob;
mod file_store;
mod memory;
mod node;

pub use blob::{Blob, BlobType};
pub use file_store::ObjectStore;
pub use memory::MemoryStore;
pub use node::StoredNode;

use crate::model::Hash;
use crate::Result;

/// Backend for persisted trees
///
/// All methods take `&self`; implementations synchronize internally.
pub trait NodeStore {
    /// Store a node, returning its hash. Storing the same node twice is a no-op.
    fn put_node(&self, node: &StoredNode) -> Result<Hash>;

    /// Fails with [`Error::NotFound`](crate::Error::NotFound) for an unknown hash
    fn get_node(&self, hash: &Hash) -> Result<StoredNode>;

    fn contains_node(&self, hash: &Hash) -> bool;

    fn root(&self, name: &str) -> Option<Hash>;

    fn set_root(&self, name: &str, hash: Hash);

    fn remove_root(&self, name: &str) -> Option<Hash>;

    /// Every named root, sorted by name
    fn roots(&self) -> Vec<(String, Hash)>;

    /// Make everything written so far durable
    fn flush(&self) -> Result<()>;
}

impl<S: NodeStore + ?Sized> NodeStore for &S {
    fn put_node(&self, node: &StoredNode) -> Result<Hash> {
        (**self).put_node(node)
    }

    fn get_node(&self, hash: &Hash) -> Result<StoredNode> {
        (**self).get_node(hash)
    }

    fn contains_node(&self, hash: &Hash) -> bool {
        (**self).contains_node(hash)
    }

    fn root(&self, name: &str) -> Option<Hash> {
        (**self).root(name)
    }

    fn set_root(&self, name: &str, hash: Hash) {
        (**self).set_root(name, hash)
    }

    fn remove_root(&self, name: &str) -> Option<Hash> {
        (**self).remove_root(name)
    }

    fn roots(&self) -> Vec<(String, Hash)> {
        (**self).roots()
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}
