//! The set of paths holding a value

use super::{GrowableView, LookupView, PathCursor, RemovableView, SizedView};
use crate::trie::{hash_one, PathTree, Paths};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

/// Live set of the paths in a tree, created by [`PathTree::path_set`]
pub struct PathSet<'a, K, V> {
    tree: &'a mut PathTree<K, V>,
}

impl<'a, K: Hash + Eq + Clone, V> PathSet<'a, K, V> {
    pub(crate) fn new(tree: &'a mut PathTree<K, V>) -> Self {
        PathSet { tree }
    }

    pub fn iter(&self) -> Paths<'_, K, V> {
        self.tree.paths()
    }

    /// Cursor that can remove the path it is on
    pub fn cursor(&mut self) -> PathCursor<'_, K, V> {
        PathCursor::new(self.tree)
    }
}

impl<K, V> SizedView for PathSet<'_, K, V> {
    fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<K: Hash + Eq + Clone, V> LookupView for PathSet<'_, K, V> {
    type Item = [K];

    fn contains(&self, path: &[K]) -> bool {
        self.tree.contains_path(path)
    }
}

impl<K: Hash + Eq + Clone, V> RemovableView for PathSet<'_, K, V> {
    fn remove(&mut self, path: &[K]) -> bool {
        self.tree.remove(path).is_some()
    }

    fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Some(path) = cursor.next() {
            if !keep(path.as_slice()) {
                // the cursor just yielded this path, so removal cannot be out of sequence
                changed |= cursor.remove().is_ok();
            }
        }
        changed
    }

    fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, V> GrowableView<Vec<K>> for PathSet<'_, K, V> {
    fn add(&mut self, _path: Vec<K>) -> Result<bool> {
        Err(Error::unsupported("cannot add a path without a value"))
    }
}

impl<'a, K: Hash + Eq + Clone, V> IntoIterator for &'a PathSet<'_, K, V> {
    type Item = Vec<K>;
    type IntoIter = Paths<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Set equality: same number of paths, and every path of one is in the other
impl<K: Hash + Eq + Clone, V, W> PartialEq<PathSet<'_, K, W>> for PathSet<'_, K, V> {
    fn eq(&self, other: &PathSet<'_, K, W>) -> bool {
        self.len() == other.len() && self.iter().all(|p| other.contains(&p))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> PartialEq<HashSet<Vec<K>, S>> for PathSet<'_, K, V> {
    fn eq(&self, other: &HashSet<Vec<K>, S>) -> bool {
        self.len() == other.len() && self.iter().all(|p| other.contains(&p))
    }
}

/// Wrapping sum of the path hashes, independent of iteration order
impl<K: Hash + Eq + Clone, V> Hash for PathSet<'_, K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let sum = self
            .iter()
            .fold(0u64, |acc, p| acc.wrapping_add(hash_one(&p)));
        state.write_usize(self.len());
        state.write_u64(sum);
    }
}

impl<K: Hash + Eq + Clone + fmt::Debug, V> fmt::Debug for PathSet<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
