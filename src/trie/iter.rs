//! Read-only iterators over a [`PathTree`]

use super::node::NodeId;
use super::PathTree;
use std::hash::Hash;
use std::iter::FusedIterator;

/// Pre-order walk over the value-bearing nodes of a tree
struct Walk<'a, K, V> {
    tree: &'a PathTree<K, V>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Walk<'a, K, V> {
    fn new(tree: &'a PathTree<K, V>) -> Self {
        Walk {
            tree,
            stack: tree.root.into_iter().collect(),
            remaining: tree.len(),
        }
    }

    fn next_node(&mut self) -> Option<(NodeId, &'a V)> {
        let tree = self.tree;
        while let Some(id) = self.stack.pop() {
            let node = tree.arena.get(id);
            self.stack.extend(node.children.values().copied());
            if let Some(value) = node.value.as_ref() {
                self.remaining -= 1;
                return Some((id, value));
            }
        }
        None
    }
}

/// Iterator over `(path, &value)` pairs, created by [`PathTree::iter`]
pub struct Iter<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a PathTree<K, V>) -> Self {
        Iter { walk: Walk::new(tree) }
    }
}

impl<'a, K: Clone, V> Iterator for Iter<'a, K, V> {
    type Item = (Vec<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, value) = self.walk.next_node()?;
        Some((self.walk.tree.path_of(id), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<K: Clone, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K: Clone, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over the paths holding a value, created by [`PathTree::paths`]
pub struct Paths<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> Paths<'a, K, V> {
    pub(crate) fn new(tree: &'a PathTree<K, V>) -> Self {
        Paths { walk: Walk::new(tree) }
    }
}

impl<K: Clone, V> Iterator for Paths<'_, K, V> {
    type Item = Vec<K>;

    fn next(&mut self) -> Option<Vec<K>> {
        let (id, _) = self.walk.next_node()?;
        Some(self.walk.tree.path_of(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<K: Clone, V> ExactSizeIterator for Paths<'_, K, V> {}
impl<K: Clone, V> FusedIterator for Paths<'_, K, V> {}

/// Iterator over the values, created by [`PathTree::values`]
///
/// Does not rebuild paths, so it is cheaper than [`Iter`].
pub struct Values<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(tree: &'a PathTree<K, V>) -> Self {
        Values { walk: Walk::new(tree) }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.walk.next_node().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Values along one path, root first, created by [`PathTree::get_all`]
pub struct GetAll<'a, K, V> {
    tree: &'a PathTree<K, V>,
    path: &'a [K],
    next: Option<NodeId>,
    depth: usize,
}

impl<'a, K, V> GetAll<'a, K, V> {
    pub(crate) fn new(tree: &'a PathTree<K, V>, path: &'a [K]) -> Self {
        GetAll {
            tree,
            path,
            next: tree.root,
            depth: 0,
        }
    }
}

impl<'a, K: Hash + Eq, V> Iterator for GetAll<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        let tree = self.tree;
        loop {
            let node = tree.arena.get(self.next?);
            self.next = self
                .path
                .get(self.depth)
                .and_then(|key| node.children.get(key).copied());
            self.depth += 1;
            if let Some(value) = node.value.as_ref() {
                return Some(value);
            }
        }
    }
}

impl<K: Hash + Eq, V> FusedIterator for GetAll<'_, K, V> {}

/// Owning iterator over `(path, value)` pairs
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(Vec<K>, V)>,
}

impl<K: Hash + Eq + Clone, V> IntoIter<K, V> {
    pub(crate) fn new(mut tree: PathTree<K, V>) -> Self {
        let ids: Vec<NodeId> = {
            let mut walk = Walk::new(&tree);
            std::iter::from_fn(|| walk.next_node().map(|(id, _)| id)).collect()
        };
        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let path = tree.path_of(id);
            if let Some(value) = tree.arena.get_mut(id).value.take() {
                entries.push((path, value));
            }
        }
        IntoIter {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (Vec<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PathTree<&'static str, i32> {
        let mut tree = PathTree::new();
        tree.put(&["a"], 1);
        tree.put(&["a", "b"], 2);
        tree.put(&["a", "c"], 3);
        tree.put(&["d", "e", "f"], 4);
        tree
    }

    #[test]
    fn test_iter_visits_every_value_once() {
        let tree = sample();
        let mut entries: Vec<_> = tree.iter().map(|(p, v)| (p, *v)).collect();
        entries.sort();
        assert_eq!(
            entries,
            vec![
                (vec!["a"], 1),
                (vec!["a", "b"], 2),
                (vec!["a", "c"], 3),
                (vec!["d", "e", "f"], 4),
            ]
        );
        assert_eq!(tree.iter().len(), 4);
    }

    #[test]
    fn test_preorder_parent_before_child() {
        let tree = sample();
        let paths: Vec<_> = tree.paths().collect();
        let a = paths.iter().position(|p| p == &vec!["a"]).unwrap();
        let ab = paths.iter().position(|p| p == &vec!["a", "b"]).unwrap();
        assert!(a < ab);
    }

    #[test]
    fn test_order_is_stable() {
        let tree = sample();
        let first: Vec<_> = tree.paths().collect();
        let second: Vec<_> = tree.paths().collect();
        assert_eq!(first, second);
        let values: Vec<_> = tree.values().copied().collect();
        let from_iter: Vec<_> = tree.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, from_iter);
    }

    #[test]
    fn test_into_iter() {
        let tree = sample();
        let mut owned: Vec<_> = tree.into_iter().collect();
        owned.sort();
        assert_eq!(owned.len(), 4);
        assert_eq!(owned[0], (vec!["a"], 1));
    }

    #[test]
    fn test_empty_tree() {
        let tree: PathTree<u8, u8> = PathTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.values().len(), 0);
    }
}
