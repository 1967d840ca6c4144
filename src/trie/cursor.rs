//! Removal-capable traversal shared by all views

use super::node::NodeId;
use super::PathTree;
use crate::{Error, Result};
use std::hash::Hash;

/// Pre-order cursor over value-bearing nodes that can remove the node it
/// last yielded
///
/// The cursor holds the tree's unique mutable borrow, so nothing else can
/// change the tree while it is alive. It still records the tree's
/// modification stamp and refuses to remove if the stamp moved under it.
///
/// Removal rules: `remove` is legal once after each successful `advance`.
/// Removing before the first `advance`, twice after one `advance`, or after
/// `advance` returned `None` is an [`Error::IllegalState`].
pub(crate) struct RawCursor<'a, K, V> {
    tree: &'a mut PathTree<K, V>,
    stack: Vec<NodeId>,
    /// Node yielded by the last `advance`, until it is removed
    current: Option<NodeId>,
    stamp: u64,
}

impl<'a, K: Hash + Eq + Clone, V> RawCursor<'a, K, V> {
    pub fn new(tree: &'a mut PathTree<K, V>) -> Self {
        let stack = tree.root.into_iter().collect();
        let stamp = tree.stamp();
        RawCursor {
            tree,
            stack,
            current: None,
            stamp,
        }
    }

    /// Move to the next value-bearing node
    pub fn advance(&mut self) -> Option<NodeId> {
        debug_assert_eq!(self.stamp, self.tree.stamp(), "tree modified under cursor");
        self.current = None;
        while let Some(id) = self.stack.pop() {
            let node = self.tree.arena.get(id);
            // children are queued before this node can be removed, so pruning
            // never releases a node that is still waiting on the stack
            self.stack.extend(node.children.values().copied());
            if node.value.is_some() {
                self.current = Some(id);
                return Some(id);
            }
        }
        None
    }

    /// Remove the value of the node last yielded by [`RawCursor::advance`]
    pub fn remove(&mut self) -> Result<V> {
        let found = self.tree.stamp();
        if found != self.stamp {
            return Err(Error::ConcurrentModification {
                expected: self.stamp,
                found,
            });
        }
        let id = self.current.take().ok_or_else(|| {
            Error::IllegalState("remove called without a preceding next".into())
        })?;
        let value = self
            .tree
            .take_at(id)
            .ok_or_else(|| Error::IllegalState(format!("node {id} holds no value")))?;
        self.stamp = self.tree.stamp();
        Ok(value)
    }

    pub fn path(&self, id: NodeId) -> Vec<K> {
        self.tree.path_of(id)
    }

    /// Value held by a node yielded by `advance`
    pub fn value(&self, id: NodeId) -> &V {
        match self.tree.arena.get(id).value.as_ref() {
            Some(value) => value,
            None => panic!("cursor node {id} holds no value"),
        }
    }

    pub fn value_mut(&mut self, id: NodeId) -> &mut V {
        match self.tree.arena.get_mut(id).value.as_mut() {
            Some(value) => value,
            None => panic!("cursor node {id} holds no value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_remove_before_advance() {
        let mut tree = PathTree::new();
        tree.put(&[1], "x");
        let mut cursor = RawCursor::new(&mut tree);
        assert_eq!(cursor.remove().unwrap_err().kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn test_double_remove() {
        let mut tree = PathTree::new();
        tree.put(&[1], "x");
        tree.put(&[2], "y");
        let mut cursor = RawCursor::new(&mut tree);
        cursor.advance().unwrap();
        cursor.remove().unwrap();
        assert_eq!(cursor.remove().unwrap_err().kind(), ErrorKind::IllegalState);
        assert!(cursor.advance().is_some());
        assert!(cursor.advance().is_none());
        assert_eq!(cursor.remove().unwrap_err().kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn test_remove_everything_while_walking() {
        let mut tree = PathTree::new();
        for path in [vec![1], vec![1, 2], vec![1, 2, 3], vec![1, 4], vec![5, 6, 7], vec![]] {
            tree.put(&path, path.len());
        }
        let mut cursor = RawCursor::new(&mut tree);
        let mut removed = 0;
        while cursor.advance().is_some() {
            cursor.remove().unwrap();
            removed += 1;
        }
        assert_eq!(removed, 6);
        assert!(tree.is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn test_selective_removal_keeps_remaining() {
        let mut tree = PathTree::new();
        for (i, path) in [vec![1], vec![1, 2], vec![1, 2, 3], vec![1, 4], vec![5]]
            .into_iter()
            .enumerate()
        {
            tree.put(&path, i);
        }
        let mut cursor = RawCursor::new(&mut tree);
        let mut seen = 0;
        while let Some(id) = cursor.advance() {
            seen += 1;
            if cursor.value(id) % 2 == 0 {
                cursor.remove().unwrap();
            }
        }
        assert_eq!(seen, 5);
        let mut left: Vec<_> = tree.values().copied().collect();
        left.sort();
        assert_eq!(left, vec![1, 3]);
        tree.validate().unwrap();
    }
}
