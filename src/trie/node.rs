//! Trie nodes and the arena that owns them

use std::collections::HashMap;

/// Index of a node slot in an [`Arena`]
pub(crate) type NodeId = usize;

/// A node in the path trie
///
/// A node owns its optional value and maps each key element to exactly one
/// child. The parent link (parent slot plus the key this node hangs under)
/// lets removal prune back toward the root and lets a cursor rebuild the path
/// of any node without carrying it along.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub value: Option<V>,
    pub children: HashMap<K, NodeId>,
    pub parent: Option<(NodeId, K)>,
}

impl<K, V> Node<K, V> {
    fn new(parent: Option<(NodeId, K)>) -> Self {
        Node {
            value: None,
            children: HashMap::new(),
            parent,
        }
    }

    /// A node with neither value nor children must not stay in the trie
    pub fn is_dead(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }
}

/// Slot storage for nodes, with free-list reuse of vacated slots
#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, parent: Option<(NodeId, K)>) -> NodeId {
        let node = Node::new(parent);
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    pub fn release(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(id)?.take();
        if node.is_some() {
            self.free.push(id);
        }
        node
    }

    /// Panics on a vacant slot: every id handed out by the trie refers to a live node
    pub fn get(&self, id: NodeId) -> &Node<K, V> {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {id}"),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {id}"),
        }
    }

    pub fn try_get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Number of occupied slots
    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
