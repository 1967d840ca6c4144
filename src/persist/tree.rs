//! Path tree with translated values and a store behind it

use super::views::{TranslatedEntries, TranslatedValues};
use crate::model::{Data, Hash};
use crate::store::{NodeStore, StoredNode};
use crate::translate::Translator;
use crate::trie::PathTree;
use crate::view::PathSet;
use crate::{Error, Result};
use std::fmt;
use std::hash::{Hash as StdHash, Hasher};

/// A [`PathTree`] whose values pass through a [`Translator`] and which can
/// be written to and loaded from a [`NodeStore`]
///
/// Values are held in memory as [`Data`]; every value handed in is converted
/// with `VT::to_data` and every value handed out with `VT::from_data`, so a
/// translation failure surfaces on the call that crossed the boundary. Path
/// key elements stay native in memory and go through `KT` only when nodes are
/// written by [`PersistentTree::flush`] or read by [`PersistentTree::open`].
///
/// Container semantics are exactly those of [`PathTree`].
pub struct PersistentTree<'s, KT, VT, S>
where
    KT: Translator,
{
    tree: PathTree<KT::Value, Data>,
    keys: KT,
    values: VT,
    store: &'s S,
    name: String,
}

impl<'s, KT, VT, S> PersistentTree<'s, KT, VT, S>
where
    KT: Translator,
    KT::Value: StdHash + Eq + Clone,
    VT: Translator,
    S: NodeStore,
{
    /// An empty tree that will be written under `name`, ignoring anything
    /// already stored there
    pub fn new(store: &'s S, name: impl Into<String>, keys: KT, values: VT) -> Self {
        PersistentTree {
            tree: PathTree::new(),
            keys,
            values,
            store,
            name: name.into(),
        }
    }

    /// Load the tree stored under `name`, or start empty if there is none
    pub fn open(store: &'s S, name: impl Into<String>, keys: KT, values: VT) -> Result<Self> {
        let mut tree = Self::new(store, name, keys, values);
        if let Some(root) = store.root(&tree.name) {
            tree.load(root)?;
        }
        Ok(tree)
    }

    /// Rebuild the nodes under `root` depth-first with an explicit stack
    fn load(&mut self, root: Hash) -> Result<()> {
        let mut stack = vec![(root, self.tree.root_or_create())];
        while let Some((hash, id)) = stack.pop() {
            let node = self.store.get_node(&hash)?;
            if node.is_empty() {
                return Err(Error::Corruption(format!("empty node {}", hash.short())));
            }
            if let Some(value) = node.value {
                self.tree.put_at(id, value);
            }
            for (key, child) in node.children {
                let key = self.keys.from_data(&key)?;
                stack.push((child, self.tree.child_or_create(id, &key)));
            }
        }
        Ok(())
    }

    /// Name of the root this tree is written under
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_translator(&self) -> &KT {
        &self.keys
    }

    pub fn value_translator(&self) -> &VT {
        &self.values
    }

    /// The in-memory tree of structured values
    pub fn raw(&self) -> &PathTree<KT::Value, Data> {
        &self.tree
    }

    fn decode(&self, data: &Data) -> Result<VT::Value> {
        self.values.from_data(data)
    }

    /// Store `value` at `path`, returning the value it replaced
    ///
    /// The previous value is decoded before anything changes, so a failed
    /// translation leaves the tree untouched.
    pub fn put(&mut self, path: &[KT::Value], value: &VT::Value) -> Result<Option<VT::Value>> {
        let data = self.values.to_data(value)?;
        let previous = self.get(path)?;
        self.tree.put(path, data);
        Ok(previous)
    }

    pub fn get(&self, path: &[KT::Value]) -> Result<Option<VT::Value>> {
        self.tree.get(path).map(|d| self.decode(d)).transpose()
    }

    /// Values along `path`, root first
    pub fn get_all(&self, path: &[KT::Value]) -> Result<Vec<VT::Value>> {
        self.tree.get_all(path).map(|d| self.decode(d)).collect()
    }

    pub fn remove(&mut self, path: &[KT::Value]) -> Result<Option<VT::Value>> {
        let previous = self.get(path)?;
        self.tree.remove(path);
        Ok(previous)
    }

    pub fn contains_path(&self, path: &[KT::Value]) -> bool {
        self.tree.contains_path(path)
    }

    /// Whether any path holds `value`; scans every value
    pub fn contains_value(&self, value: &VT::Value) -> Result<bool> {
        let data = self.values.to_data(value)?;
        Ok(self.tree.contains_value(&data))
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Store every `(path, value)` pair from `source`
    ///
    /// Values are translated before the first one is stored.
    pub fn put_all<I>(&mut self, source: I) -> Result<()>
    where
        I: IntoIterator<Item = (Vec<KT::Value>, VT::Value)>,
    {
        let translated = source
            .into_iter()
            .map(|(path, value)| -> Result<(Vec<KT::Value>, Data)> {
                Ok((path, self.values.to_data(&value)?))
            })
            .collect::<Result<Vec<_>>>()?;
        self.tree.put_all(translated);
        Ok(())
    }

    /// Every `(path, value)` pair, decoded, in pre-order
    pub fn entries(&self) -> Result<Vec<(Vec<KT::Value>, VT::Value)>> {
        self.tree
            .iter()
            .map(|(path, data)| -> Result<(Vec<KT::Value>, VT::Value)> {
                Ok((path, self.decode(data)?))
            })
            .collect()
    }

    /// Decode into a plain [`PathTree`]
    pub fn to_tree(&self) -> Result<PathTree<KT::Value, VT::Value>> {
        Ok(self.entries()?.into_iter().collect())
    }

    /// Live view of the paths
    pub fn path_set(&mut self) -> PathSet<'_, KT::Value, Data> {
        self.tree.path_set()
    }

    /// Live view of the decoded values
    pub fn value_collection(&mut self) -> TranslatedValues<'_, KT::Value, VT> {
        TranslatedValues::new(self.tree.value_collection(), &self.values)
    }

    /// Live view of the decoded entries
    pub fn entry_set(&mut self) -> TranslatedEntries<'_, KT::Value, VT> {
        TranslatedEntries::new(self.tree.entry_set(), &self.values)
    }

    /// Write every node to the store bottom-up and record the root
    ///
    /// Returns the root hash, or [`Hash::ZERO`] for an empty tree, whose
    /// root entry is removed instead.
    pub fn flush(&self) -> Result<Hash> {
        let store = self.store;
        let keys = &self.keys;
        let root = self.tree.fold(|value, children| {
            let children = children
                .into_iter()
                .map(|(key, hash)| -> Result<(Data, Hash)> { Ok((keys.to_data(key)?, hash)) })
                .collect::<Result<Vec<_>>>()?;
            store.put_node(&StoredNode::new(value.cloned(), children))
        })?;

        let hash = match root {
            Some(hash) => {
                store.set_root(&self.name, hash);
                hash
            }
            None => {
                store.remove_root(&self.name);
                Hash::ZERO
            }
        };
        store.flush()?;
        Ok(hash)
    }
}

impl<KT, VT, S> PartialEq for PersistentTree<'_, KT, VT, S>
where
    KT: Translator,
    KT::Value: StdHash + Eq + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<KT, VT, S> PartialEq<PathTree<KT::Value, Data>> for PersistentTree<'_, KT, VT, S>
where
    KT: Translator,
    KT::Value: StdHash + Eq + Clone,
{
    fn eq(&self, other: &PathTree<KT::Value, Data>) -> bool {
        self.tree == *other
    }
}

impl<KT, VT, S> StdHash for PersistentTree<'_, KT, VT, S>
where
    KT: Translator,
    KT::Value: StdHash + Eq + Clone,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<KT, VT, S> fmt::Debug for PersistentTree<'_, KT, VT, S>
where
    KT: Translator,
    KT::Value: StdHash + Eq + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentTree")
            .field("name", &self.name)
            .field("entries", &self.tree)
            .finish()
    }
}
