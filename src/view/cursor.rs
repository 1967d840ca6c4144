//! Cursors for the three views
//!
//! Each cursor lends its current element until the next call to `next`, and
//! can remove that element from the tree with `remove`. They all walk the
//! same pre-order, so the k-th path, value and entry refer to the same node.

use crate::trie::{PathTree, RawCursor};
use crate::Result;
use std::fmt;
use std::hash::Hash;

/// Cursor over the paths of a tree, created by [`PathSet::cursor`](super::PathSet::cursor)
pub struct PathCursor<'a, K, V> {
    raw: RawCursor<'a, K, V>,
}

impl<'a, K: Hash + Eq + Clone, V> PathCursor<'a, K, V> {
    pub(crate) fn new(tree: &'a mut PathTree<K, V>) -> Self {
        PathCursor {
            raw: RawCursor::new(tree),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Vec<K>> {
        let id = self.raw.advance()?;
        Some(self.raw.path(id))
    }

    /// Remove the path last returned by `next`, returning the value it held
    pub fn remove(&mut self) -> Result<V> {
        self.raw.remove()
    }
}

/// Cursor over the values of a tree, created by
/// [`ValueCollection::cursor`](super::ValueCollection::cursor)
pub struct ValueCursor<'a, K, V> {
    raw: RawCursor<'a, K, V>,
}

impl<'a, K: Hash + Eq + Clone, V> ValueCursor<'a, K, V> {
    pub(crate) fn new(tree: &'a mut PathTree<K, V>) -> Self {
        ValueCursor {
            raw: RawCursor::new(tree),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&V> {
        let id = self.raw.advance()?;
        Some(self.raw.value(id))
    }

    /// Remove the value last returned by `next`
    pub fn remove(&mut self) -> Result<V> {
        self.raw.remove()
    }
}

/// Cursor over the entries of a tree, created by [`EntrySet::cursor`](super::EntrySet::cursor)
pub struct EntryCursor<'a, K, V> {
    raw: RawCursor<'a, K, V>,
}

impl<'a, K: Hash + Eq + Clone, V> EntryCursor<'a, K, V> {
    pub(crate) fn new(tree: &'a mut PathTree<K, V>) -> Self {
        EntryCursor {
            raw: RawCursor::new(tree),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Entry<'_, K, V>> {
        let id = self.raw.advance()?;
        let path = self.raw.path(id);
        Some(Entry {
            path,
            value: self.raw.value_mut(id),
        })
    }

    /// Remove the entry last returned by `next`, returning its value
    pub fn remove(&mut self) -> Result<V> {
        self.raw.remove()
    }
}

/// A `(path, value)` pair borrowed from the tree
///
/// Replacing the value through [`Entry::set_value`] writes straight into the
/// node that holds it.
pub struct Entry<'c, K, V> {
    path: Vec<K>,
    value: &'c mut V,
}

impl<'c, K, V> Entry<'c, K, V> {
    pub fn path(&self) -> &[K] {
        &self.path
    }

    pub fn value(&self) -> &V {
        &*self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut *self.value
    }

    /// Replace the stored value, returning the old one
    pub fn set_value(&mut self, value: V) -> V {
        std::mem::replace(self.value, value)
    }

    pub fn to_pair(&self) -> (Vec<K>, V)
    where
        K: Clone,
        V: Clone,
    {
        (self.path.clone(), self.value.clone())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entry")
            .field(&self.path)
            .field(&self.value)
            .finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq<(Vec<K>, V)> for Entry<'_, K, V> {
    fn eq(&self, other: &(Vec<K>, V)) -> bool {
        self.path == other.0 && *self.value == other.1
    }
}
