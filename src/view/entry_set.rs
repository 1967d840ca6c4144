//! The set of `(path, value)` entries of a tree

use super::{EntryCursor, GrowableView, LookupView, RemovableView, SizedView};
use crate::trie::{entry_hash, Iter, PathTree};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

/// Live set of the entries of a tree, created by [`PathTree::entry_set`]
///
/// An entry is present when its path holds a value equal to the entry's
/// value. Entries obtained from [`EntrySet::cursor`] can replace the value
/// stored in the tree.
pub struct EntrySet<'a, K, V> {
    tree: &'a mut PathTree<K, V>,
}

impl<'a, K: Hash + Eq + Clone, V> EntrySet<'a, K, V> {
    pub(crate) fn new(tree: &'a mut PathTree<K, V>) -> Self {
        EntrySet { tree }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Cursor yielding entries that can be updated or removed
    pub fn cursor(&mut self) -> EntryCursor<'_, K, V> {
        EntryCursor::new(self.tree)
    }

    /// Whether `path` holds a value equal to `value`
    pub fn contains_entry(&self, path: &[K], value: &V) -> bool
    where
        V: PartialEq,
    {
        self.tree.get(path) == Some(value)
    }

    /// Remove `path` only if it holds a value equal to `value`
    pub fn remove_entry(&mut self, path: &[K], value: &V) -> bool
    where
        V: PartialEq,
    {
        self.contains_entry(path, value) && self.tree.remove(path).is_some()
    }

    /// Keep the entries for which `keep` returns true
    ///
    /// `keep` may also rewrite the value of the entries it keeps.
    pub fn retain_entries<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&[K], &mut V) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Some(mut entry) = cursor.next() {
            let path = entry.path().to_vec();
            if !keep(&path, entry.value_mut()) {
                changed |= cursor.remove().is_ok();
            }
        }
        changed
    }
}

impl<K, V> SizedView for EntrySet<'_, K, V> {
    fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq> LookupView for EntrySet<'_, K, V> {
    type Item = (Vec<K>, V);

    fn contains(&self, (path, value): &(Vec<K>, V)) -> bool {
        self.contains_entry(path, value)
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq + Clone> RemovableView for EntrySet<'_, K, V> {
    fn remove(&mut self, (path, value): &(Vec<K>, V)) -> bool {
        self.remove_entry(path, value)
    }

    fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Some(entry) = cursor.next() {
            let pair = entry.to_pair();
            if !keep(&pair) {
                changed |= cursor.remove().is_ok();
            }
        }
        changed
    }

    fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, V> GrowableView<(Vec<K>, V)> for EntrySet<'_, K, V> {
    fn add(&mut self, _entry: (Vec<K>, V)) -> Result<bool> {
        Err(Error::unsupported("entries are added through the tree"))
    }
}

impl<'a, K: Hash + Eq + Clone, V> IntoIterator for &'a EntrySet<'_, K, V> {
    type Item = (Vec<K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq> PartialEq<EntrySet<'_, K, V>> for EntrySet<'_, K, V> {
    fn eq(&self, other: &EntrySet<'_, K, V>) -> bool {
        *self.tree == *other.tree
    }
}

impl<K, V, S> PartialEq<HashMap<Vec<K>, V, S>> for EntrySet<'_, K, V>
where
    K: Hash + Eq + Clone,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &HashMap<Vec<K>, V, S>) -> bool {
        *self.tree == *other
    }
}

/// Same hash as the tree: the wrapping sum of per-entry hashes
impl<K: Hash + Eq + Clone, V: Hash> Hash for EntrySet<'_, K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let sum = self
            .iter()
            .fold(0u64, |acc, (p, v)| acc.wrapping_add(entry_hash(&p, v)));
        state.write_usize(self.len());
        state.write_u64(sum);
    }
}

impl<K: Hash + Eq + Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for EntrySet<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
