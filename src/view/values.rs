//! The collection of values held by a tree

use super::{GrowableView, LookupView, RemovableView, SizedView, ValueCursor};
use crate::trie::{PathTree, Values};
use crate::{Error, Result};
use std::fmt;
use std::hash::Hash;

/// Live collection of the values in a tree, created by [`PathTree::value_collection`]
///
/// Values are not unique: two paths holding equal values contribute two
/// elements. [`RemovableView::remove`] removes the first equal value in
/// traversal order; [`RemovableView::remove_all`] removes every one.
pub struct ValueCollection<'a, K, V> {
    tree: &'a mut PathTree<K, V>,
}

impl<'a, K: Hash + Eq + Clone, V> ValueCollection<'a, K, V> {
    pub(crate) fn new(tree: &'a mut PathTree<K, V>) -> Self {
        ValueCollection { tree }
    }

    pub fn iter(&self) -> Values<'_, K, V> {
        self.tree.values()
    }

    /// Cursor that can remove the value it is on
    pub fn cursor(&mut self) -> ValueCursor<'_, K, V> {
        ValueCursor::new(self.tree)
    }

    /// Number of elements equal to `value`
    pub fn count(&self, value: &V) -> usize
    where
        V: PartialEq,
    {
        self.iter().filter(|v| *v == value).count()
    }
}

impl<K, V> SizedView for ValueCollection<'_, K, V> {
    fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq> LookupView for ValueCollection<'_, K, V> {
    type Item = V;

    /// Scans every value in the tree
    fn contains(&self, value: &V) -> bool {
        self.tree.contains_value(value)
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq> RemovableView for ValueCollection<'_, K, V> {
    fn remove(&mut self, value: &V) -> bool {
        let mut cursor = self.cursor();
        while let Some(v) = cursor.next() {
            if v == value {
                return cursor.remove().is_ok();
            }
        }
        false
    }

    fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Some(v) = cursor.next() {
            if !keep(v) {
                changed |= cursor.remove().is_ok();
            }
        }
        changed
    }

    fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K, V> GrowableView<V> for ValueCollection<'_, K, V> {
    fn add(&mut self, _value: V) -> Result<bool> {
        Err(Error::unsupported("cannot add a value without a path"))
    }
}

impl<'a, K: Hash + Eq + Clone, V> IntoIterator for &'a ValueCollection<'_, K, V> {
    type Item = &'a V;
    type IntoIter = Values<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Multiset equality: every value occurs equally often in both
impl<K: Hash + Eq + Clone, V: PartialEq, L: Hash + Eq + Clone> PartialEq<ValueCollection<'_, L, V>>
    for ValueCollection<'_, K, V>
{
    fn eq(&self, other: &ValueCollection<'_, L, V>) -> bool {
        self.len() == other.len() && self.iter().all(|v| self.count(v) == other.count(v))
    }
}

impl<K: Hash + Eq + Clone, V: PartialEq> PartialEq<Vec<V>> for ValueCollection<'_, K, V> {
    fn eq(&self, other: &Vec<V>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|v| self.count(v) == other.iter().filter(|o| *o == v).count())
    }
}

impl<K: Hash + Eq + Clone, V: fmt::Debug> fmt::Debug for ValueCollection<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
