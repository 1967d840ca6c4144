//! Path-keyed trie
//!
//! Nodes live in an index arena owned by the tree:
//! - Each node holds an optional value and a map from key element to child slot
//! - Each node records its parent slot, used to prune and to rebuild paths
//! - A node with no value and no children is released immediately

mod cursor;
mod iter;
mod node;
mod tree;

#[cfg(test)]
mod proptests;

pub(crate) use cursor::RawCursor;
pub(crate) use tree::{entry_hash, hash_one};

pub use iter::{GetAll, IntoIter, Iter, Paths, Values};
pub use tree::PathTree;
