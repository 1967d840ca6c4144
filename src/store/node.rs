//! Stored form of a trie node

use super::blob::{Blob, BlobType};
use crate::codec::tagged;
use crate::model::{Data, Hash};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A trie node as written to a [`NodeStore`](super::NodeStore)
///
/// Keys are stored in their structured form and children are referenced by
/// content hash, so identical subtrees are written once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNode {
    pub value: Option<Data>,
    /// Sorted by the tagged encoding of the key
    pub children: Vec<(Data, Hash)>,
}

impl StoredNode {
    pub fn new(value: Option<Data>, mut children: Vec<(Data, Hash)>) -> Self {
        children.sort_by_cached_key(|(key, _)| tagged::encode(key));
        StoredNode { value, children }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    pub fn to_blob(&self) -> Result<Blob> {
        Ok(Blob::new(BlobType::Node, bincode::serialize(self)?))
    }

    pub fn from_blob(blob: &Blob) -> Result<Self> {
        if blob.blob_type != BlobType::Node {
            return Err(Error::Corruption(format!(
                "Expected Node, got {:?}",
                blob.blob_type
            )));
        }
        Ok(bincode::deserialize(&blob.data)?)
    }

    /// Content hash of the node, the same in every store
    pub fn hash(&self) -> Result<Hash> {
        Ok(self.to_blob()?.hash())
    }
}
