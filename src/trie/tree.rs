//! Path-keyed trie

use super::iter::{GetAll, IntoIter, Iter, Paths, Values};
use super::node::{Arena, NodeId};
use crate::view::{EntrySet, PathSet, ValueCollection};
use crate::{Error, Result};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

/// An associative container keyed by paths (sequences of key elements)
///
/// Each path addresses one node; a node may hold a value. Intermediate nodes
/// are created on demand by [`PathTree::put`] and pruned again by
/// [`PathTree::remove`], so the structure never holds a node with neither a
/// value nor children. Paths share storage for their common prefixes.
///
/// Key elements only need `Hash + Eq`: there is no ordering requirement.
/// Iteration is a pre-order walk of the node structure and is stable for a
/// given tree state, but is unrelated to insertion order.
///
/// An explicit "no value" is modelled by choosing `V = Option<T>`: a path
/// holding `None` is present, a path holding nothing is absent.
///
/// # Example
///
/// ```
/// use pathgraph::PathTree;
///
/// let mut tree = PathTree::new();
/// tree.put(&["a", "b"], "v1");
/// tree.put(&["a"], "v2");
///
/// assert_eq!(tree.get(&["a", "b"]), Some(&"v1"));
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.remove(&["a", "b"]), Some("v1"));
/// assert_eq!(tree.get(&["a"]), Some(&"v2"));
/// ```
pub struct PathTree<K, V> {
    pub(crate) arena: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
    len: usize,
    /// Bumped on every change to the set of value-bearing paths
    stamp: u64,
}

impl<K, V> PathTree<K, V> {
    /// Create an empty tree
    pub fn new() -> Self {
        PathTree {
            arena: Arena::new(),
            root: None,
            len: 0,
            stamp: 0,
        }
    }

    /// Number of paths holding a value
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
        self.stamp += 1;
    }

    /// Iterate over `(path, value)` pairs in pre-order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Iterate over the values only, in pre-order
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self)
    }

    pub(crate) fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Reconstruct the path of a node from its parent links
    pub(crate) fn path_of(&self, mut id: NodeId) -> Vec<K>
    where
        K: Clone,
    {
        let mut path = Vec::new();
        while let Some((parent, key)) = &self.arena.get(id).parent {
            path.push(key.clone());
            id = *parent;
        }
        path.reverse();
        path
    }

    /// Clear the value held by `id` and prune any dead branch above it
    pub(crate) fn take_at(&mut self, id: NodeId) -> Option<V>
    where
        K: Hash + Eq,
    {
        let value = self.arena.get_mut(id).value.take()?;
        self.len -= 1;
        self.stamp += 1;
        self.prune(id);
        Some(value)
    }

    /// Walk from `id` toward the root releasing nodes left with nothing in them
    fn prune(&mut self, mut id: NodeId)
    where
        K: Hash + Eq,
    {
        while self.arena.get(id).is_dead() {
            let node = match self.arena.release(id) {
                Some(node) => node,
                None => return,
            };
            match node.parent {
                Some((parent, key)) => {
                    self.arena.get_mut(parent).children.remove(&key);
                    id = parent;
                }
                None => {
                    self.root = None;
                    return;
                }
            }
        }
    }
}

impl<K: Hash + Eq + Clone, V> PathTree<K, V> {
    /// Store `value` at `path`, creating missing intermediate nodes
    ///
    /// Returns the value previously held at exactly that path.
    pub fn put(&mut self, path: &[K], value: V) -> Option<V> {
        let id = self.locate_or_create(path);
        self.put_at(id, value)
    }

    /// The value at `path`; never creates nodes
    pub fn get(&self, path: &[K]) -> Option<&V> {
        self.locate(path)
            .and_then(|id| self.arena.get(id).value.as_ref())
    }

    pub fn get_mut(&mut self, path: &[K]) -> Option<&mut V> {
        let id = self.locate(path)?;
        self.arena.get_mut(id).value.as_mut()
    }

    /// Values held along `path`, root first, skipping nodes without a value
    pub fn get_all<'a>(&'a self, path: &'a [K]) -> GetAll<'a, K, V> {
        GetAll::new(self, path)
    }

    /// Remove the value at `path`, pruning branches that become empty
    ///
    /// Returns the removed value, or `None` if the path held nothing.
    pub fn remove(&mut self, path: &[K]) -> Option<V> {
        let id = self.locate(path)?;
        self.take_at(id)
    }

    /// Whether a value is stored at exactly `path`
    pub fn contains_path(&self, path: &[K]) -> bool {
        self.get(path).is_some()
    }

    /// Whether any path holds a value equal to `value`
    ///
    /// This scans every value-bearing node.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Copy every `(path, value)` pair from `source`
    pub fn put_all<I>(&mut self, source: I)
    where
        I: IntoIterator<Item = (Vec<K>, V)>,
    {
        for (path, value) in source {
            self.put(&path, value);
        }
    }

    /// Iterate over the paths holding a value, in pre-order
    pub fn paths(&self) -> Paths<'_, K, V> {
        Paths::new(self)
    }

    /// Live view of the paths, supporting removal
    pub fn path_set(&mut self) -> PathSet<'_, K, V> {
        PathSet::new(self)
    }

    /// Live view of the values, supporting removal
    pub fn value_collection(&mut self) -> ValueCollection<'_, K, V> {
        ValueCollection::new(self)
    }

    /// Live view of the `(path, value)` entries, supporting removal and
    /// in-place value replacement
    pub fn entry_set(&mut self) -> EntrySet<'_, K, V> {
        EntrySet::new(self)
    }

    /// Flatten into a map from path to value
    pub fn to_map(&self) -> HashMap<Vec<K>, V>
    where
        V: Clone,
    {
        self.iter().map(|(p, v)| (p, v.clone())).collect()
    }

    /// Check the structural invariants
    ///
    /// Every node is reachable from the root through consistent parent links,
    /// no node is empty, and the number of value-bearing nodes matches
    /// [`PathTree::len`].
    pub fn validate(&self) -> Result<()> {
        let root = match self.root {
            None if self.len == 0 && self.arena.live() == 0 => return Ok(()),
            None => {
                return Err(Error::Corruption(format!(
                    "no root but len={} live={}",
                    self.len,
                    self.arena.live()
                )))
            }
            Some(root) => root,
        };

        let root_node = self
            .arena
            .try_get(root)
            .ok_or_else(|| Error::Corruption("root slot is vacant".into()))?;
        if root_node.parent.is_some() {
            return Err(Error::Corruption("root has a parent".into()));
        }

        let mut visited = 0usize;
        let mut values = 0usize;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self
                .arena
                .try_get(id)
                .ok_or_else(|| Error::Corruption(format!("dangling child {id}")))?;
            visited += 1;
            if node.is_dead() {
                return Err(Error::Corruption(format!("empty node {id} retained")));
            }
            if node.value.is_some() {
                values += 1;
            }
            for (key, &child) in &node.children {
                let linked = self
                    .arena
                    .try_get(child)
                    .and_then(|c| c.parent.as_ref())
                    .is_some_and(|(p, k)| *p == id && k == key);
                if !linked {
                    return Err(Error::Corruption(format!(
                        "child {child} does not link back to {id}"
                    )));
                }
                stack.push(child);
            }
        }

        if values != self.len {
            return Err(Error::Corruption(format!(
                "len is {} but {values} nodes hold values",
                self.len
            )));
        }
        if visited != self.arena.live() {
            return Err(Error::Corruption(format!(
                "{} live nodes but {visited} reachable",
                self.arena.live()
            )));
        }
        Ok(())
    }

    /// Post-order fold over the node structure
    ///
    /// `f` receives each node's value and its children's results keyed by
    /// their key element. Returns `None` for an empty tree. The walk keeps
    /// its own stack, so path length is not bounded by the thread stack.
    pub(crate) fn fold<T, F>(&self, mut f: F) -> Result<Option<T>>
    where
        F: FnMut(Option<&V>, Vec<(&K, T)>) -> Result<T>,
    {
        let root = match self.root {
            None => return Ok(None),
            Some(root) => root,
        };

        // (node, children already queued)
        let mut stack = vec![(root, false)];
        let mut results: Vec<T> = Vec::new();
        while let Some((id, expanded)) = stack.pop() {
            let node = self.arena.get(id);
            if !expanded {
                stack.push((id, true));
                stack.extend(node.children.values().map(|&child| (child, false)));
                continue;
            }
            // children finish in reverse of the order they were queued
            let mut done = results.split_off(results.len() - node.children.len());
            done.reverse();
            let children = node.children.keys().zip(done).collect();
            results.push(f(node.value.as_ref(), children)?);
        }
        Ok(results.pop())
    }

    /// Root node, allocated if the tree is empty
    pub(crate) fn root_or_create(&mut self) -> NodeId {
        match self.root {
            Some(root) => root,
            None => {
                let root = self.arena.alloc(None);
                self.root = Some(root);
                root
            }
        }
    }

    /// Child of `parent` under `key`, allocated if missing
    pub(crate) fn child_or_create(&mut self, parent: NodeId, key: &K) -> NodeId {
        match self.arena.get(parent).children.get(key) {
            Some(&child) => child,
            None => {
                let child = self.arena.alloc(Some((parent, key.clone())));
                self.arena.get_mut(parent).children.insert(key.clone(), child);
                child
            }
        }
    }

    /// Store `value` in an existing node
    pub(crate) fn put_at(&mut self, id: NodeId, value: V) -> Option<V> {
        let previous = self.arena.get_mut(id).value.replace(value);
        if previous.is_none() {
            self.len += 1;
            self.stamp += 1;
        }
        previous
    }

    fn locate(&self, path: &[K]) -> Option<NodeId> {
        let mut id = self.root?;
        for key in path {
            id = *self.arena.get(id).children.get(key)?;
        }
        Some(id)
    }

    fn locate_or_create(&mut self, path: &[K]) -> NodeId {
        let mut id = self.root_or_create();
        for key in path {
            id = self.child_or_create(id, key);
        }
        id
    }
}

/// Hash of a single value with a fixed-key hasher
pub(crate) fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash of one `(path, value)` pair; container hashes are wrapping sums of these
pub(crate) fn entry_hash<K: Hash, V: Hash>(path: &[K], value: &V) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

impl<K, V> Default for PathTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for PathTree<K, V> {
    fn clone(&self) -> Self {
        PathTree {
            arena: self.arena.clone(),
            root: self.root,
            len: self.len,
            stamp: 0,
        }
    }
}

impl<K: Hash + Eq + Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for PathTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both hold exactly the same `(path, value)` pairs
impl<K: Hash + Eq + Clone, V: PartialEq> PartialEq for PathTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(p, v)| other.get(&p) == Some(v))
    }
}

impl<K: Hash + Eq + Clone, V: Eq> Eq for PathTree<K, V> {}

impl<K, V, S> PartialEq<HashMap<Vec<K>, V, S>> for PathTree<K, V>
where
    K: Hash + Eq + Clone,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &HashMap<Vec<K>, V, S>) -> bool {
        self.len == other.len() && self.iter().all(|(p, v)| other.get(&p) == Some(v))
    }
}

/// Order-independent: the wrapping sum of per-entry hashes
impl<K: Hash + Eq + Clone, V: Hash> Hash for PathTree<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let sum = self
            .iter()
            .fold(0u64, |acc, (p, v)| acc.wrapping_add(entry_hash(&p, v)));
        state.write_usize(self.len);
        state.write_u64(sum);
    }
}

impl<K: Hash + Eq + Clone, V> FromIterator<(Vec<K>, V)> for PathTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (Vec<K>, V)>>(iter: I) -> Self {
        let mut tree = PathTree::new();
        tree.put_all(iter);
        tree
    }
}

impl<K: Hash + Eq + Clone, V> Extend<(Vec<K>, V)> for PathTree<K, V> {
    fn extend<I: IntoIterator<Item = (Vec<K>, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

impl<K: Hash + Eq + Clone, V, S> From<HashMap<Vec<K>, V, S>> for PathTree<K, V> {
    fn from(map: HashMap<Vec<K>, V, S>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a, K: Clone, V> IntoIterator for &'a PathTree<K, V> {
    type Item = (Vec<K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq + Clone, V> IntoIterator for PathTree<K, V> {
    type Item = (Vec<K>, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Vec<String> {
        if s.is_empty() {
            return Vec::new();
        }
        s.split('/').map(str::to_string).collect()
    }

    #[test]
    fn test_put_get_independent_of_order() {
        let mut t1 = PathTree::new();
        t1.put(&p("a/b"), 1);
        t1.put(&p("a/c"), 2);
        let mut t2 = PathTree::new();
        t2.put(&p("a/c"), 2);
        t2.put(&p("a/b"), 1);

        for t in [&t1, &t2] {
            assert_eq!(t.get(&p("a/b")), Some(&1));
            assert_eq!(t.get(&p("a/c")), Some(&2));
            assert_eq!(t.get(&p("a")), None);
            t.validate().unwrap();
        }
    }

    #[test]
    fn test_put_returns_previous() {
        let mut tree = PathTree::new();
        assert_eq!(tree.put(&p("x"), "one"), None);
        assert_eq!(tree.put(&p("x"), "two"), Some("one"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_root_path_holds_a_value() {
        let mut tree = PathTree::new();
        tree.put(&p(""), 0);
        tree.put(&p("a"), 1);
        assert_eq!(tree.get(&[]), Some(&0));
        assert_eq!(tree.remove(&[]), Some(0));
        assert_eq!(tree.get(&p("a")), Some(&1));
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_prunes_dead_branches() {
        let mut tree = PathTree::new();
        tree.put(&p("a/b/c/d"), 1);
        tree.put(&p("a/x"), 2);
        assert_eq!(tree.arena.live(), 6);

        assert_eq!(tree.remove(&p("a/b/c/d")), Some(1));
        // root, a and x remain
        assert_eq!(tree.arena.live(), 3);
        tree.validate().unwrap();

        assert_eq!(tree.remove(&p("a/x")), Some(2));
        assert_eq!(tree.arena.live(), 0);
        assert!(tree.root.is_none());
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_absent_is_none() {
        let mut tree = PathTree::new();
        tree.put(&p("a/b"), 1);
        assert_eq!(tree.remove(&p("a")), None);
        assert_eq!(tree.remove(&p("a/b/c")), None);
        assert_eq!(tree.remove(&p("z")), None);
        assert_eq!(tree.len(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn test_get_all_root_first() {
        let mut tree = PathTree::new();
        tree.put(&p(""), 0);
        tree.put(&p("a/b"), 2);
        tree.put(&p("a/b/c/d"), 4);
        let path = p("a/b/c/d/e");
        let found: Vec<_> = tree.get_all(&path).copied().collect();
        assert_eq!(found, vec![0, 2, 4]);
        assert_eq!(tree.get_all(&p("q")).count(), 1);
        assert_eq!(PathTree::<String, i32>::new().get_all(&path).count(), 0);
    }

    #[test]
    fn test_contains() {
        let mut tree = PathTree::new();
        tree.put(&p("a/b"), 5);
        assert!(tree.contains_path(&p("a/b")));
        assert!(!tree.contains_path(&p("a")));
        assert!(tree.contains_value(&5));
        assert!(!tree.contains_value(&6));
    }

    #[test]
    fn test_explicit_none_is_distinct_from_absent() {
        let mut tree: PathTree<&str, Option<i32>> = PathTree::new();
        tree.put(&["a"], None);
        assert!(tree.contains_path(&["a"]));
        assert_eq!(tree.get(&["a"]), Some(&None));
        assert_eq!(tree.get(&["b"]), None);
        assert_eq!(tree.remove(&["a"]), Some(None));
    }

    #[test]
    fn test_clear() {
        let mut tree: PathTree<_, _> = vec![(p("a"), 1), (p("b/c"), 2)].into_iter().collect();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.get(&p("a")), None);
        tree.validate().unwrap();
        tree.put(&p("a"), 3);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_equality_and_hash_ignore_insertion_order() {
        let entries = vec![(p("a"), 1), (p("a/b"), 2), (p("c/d/e"), 3)];
        let t1: PathTree<_, _> = entries.clone().into_iter().collect();
        let t2: PathTree<_, _> = entries.clone().into_iter().rev().collect();
        assert_eq!(t1, t2);
        assert_eq!(hash_one(&t1), hash_one(&t2));

        let map: HashMap<Vec<String>, i32> = entries.into_iter().collect();
        assert_eq!(t1, map);

        let mut t3 = t1.clone();
        t3.put(&p("a"), 9);
        assert_ne!(t1, t3);
    }

    #[test]
    fn test_put_all_and_conversions() {
        let mut source = PathTree::new();
        source.put(&p("x/y"), 1);
        source.put(&p("x"), 2);

        let mut target = PathTree::new();
        target.put(&p("z"), 3);
        target.put_all(source.clone());
        assert_eq!(target.len(), 3);

        let map = target.to_map();
        let back = PathTree::from(map);
        assert_eq!(back, target);
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut tree = PathTree::new();
        tree.put(&p("a"), 1);
        *tree.get_mut(&p("a")).unwrap() += 10;
        assert_eq!(tree.get(&p("a")), Some(&11));
        assert!(tree.get_mut(&p("b")).is_none());
    }

    #[test]
    fn test_debug_renders_as_map() {
        let mut tree = PathTree::new();
        tree.put(&["k"], 1);
        assert_eq!(format!("{tree:?}"), r#"{["k"]: 1}"#);
    }

    #[test]
    fn test_fold_sees_children_with_their_keys() {
        let mut tree = PathTree::new();
        tree.put(&p("a/b"), 2);
        tree.put(&p("a/c"), 3);
        tree.put(&p("d"), 4);
        tree.put(&p(""), 1);

        // rebuild each subtree's sum, checking every child key along the way
        let total = tree
            .fold(|value, children| {
                let mut sum = value.copied().unwrap_or(0);
                for (key, child) in children {
                    assert!(["a", "b", "c", "d"].contains(&key.as_str()));
                    sum += child;
                }
                Ok(sum)
            })
            .unwrap();
        assert_eq!(total, Some(10));
        assert_eq!(PathTree::<String, i32>::new().fold(|_, _| Ok(0)).unwrap(), None);
    }

    #[test]
    fn test_fold_over_long_path() {
        let mut tree = PathTree::new();
        let deep: Vec<u32> = (0..100_000).collect();
        tree.put(&deep, 1u32);
        let depth = tree
            .fold(|_, children| Ok(children.into_iter().map(|(_, d)| d + 1).max().unwrap_or(0)))
            .unwrap();
        assert_eq!(depth, Some(100_000));
    }
}
