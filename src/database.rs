//! High-level Database API
//!
//! This module provides the main entry point for working with persisted trees.

use crate::model::Hash;
use crate::persist::PersistentTree;
use crate::store::{MemoryStore, NodeStore, ObjectStore};
use crate::translate::{SharedTranslator, Translator, TranslatorRegistry};
use crate::Result;
use std::hash::Hash as StdHash;
use std::path::Path;

/// A store of named trees
///
/// Provides a convenient API for:
/// - Opening trees by name with explicit translators, or with translators
///   looked up in the database's [`TranslatorRegistry`]
/// - Listing and dropping trees
/// - Flushing and closing the backing store
///
/// Trees borrow the database, so they must be dropped before it is closed.
/// Each tree writes its root when flushed; two trees open under the same
/// name overwrite each other's root, last flush wins.
pub struct Database<S: NodeStore = ObjectStore> {
    store: S,
    registry: TranslatorRegistry,
}

impl Database<ObjectStore> {
    /// Create a new database file at the given path
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_store(ObjectStore::create(path)?))
    }

    /// Open an existing database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_store(ObjectStore::open(path)?))
    }

    /// Open or create a database file
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_store(ObjectStore::open_or_create(path)?))
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Number of nodes in the file, across all trees
    pub fn object_count(&self) -> usize {
        self.store.object_count()
    }
}

impl Database<MemoryStore> {
    /// A database that lives only as long as the value
    pub fn in_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<S: NodeStore> Database<S> {
    /// Wrap a store, with the default translators registered
    pub fn with_store(store: S) -> Self {
        Database {
            store,
            registry: TranslatorRegistry::with_defaults(),
        }
    }

    /// Replace the translator registry
    pub fn with_registry(mut self, registry: TranslatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &TranslatorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TranslatorRegistry {
        &mut self.registry
    }

    /// Open the tree stored under `name`, or an empty one if there is none
    pub fn tree<KT, VT>(
        &self,
        name: &str,
        keys: KT,
        values: VT,
    ) -> Result<PersistentTree<'_, KT, VT, S>>
    where
        KT: Translator,
        KT::Value: StdHash + Eq + Clone,
        VT: Translator,
    {
        PersistentTree::open(&self.store, name, keys, values)
    }

    /// Open a tree using the registered translators for `K` and `V`
    ///
    /// Fails with [`Error::Unsupported`](crate::Error::Unsupported) when
    /// either type has no translator.
    #[allow(clippy::type_complexity)]
    pub fn typed_tree<K, V>(
        &self,
        name: &str,
    ) -> Result<PersistentTree<'_, SharedTranslator<K>, SharedTranslator<V>, S>>
    where
        K: StdHash + Eq + Clone + 'static,
        V: 'static,
    {
        let keys = self.registry.require::<K>()?;
        let values = self.registry.require::<V>()?;
        self.tree(name, keys, values)
    }

    /// Names of all stored trees, sorted
    pub fn tree_names(&self) -> Vec<String> {
        self.store.roots().into_iter().map(|(name, _)| name).collect()
    }

    /// Root hash of a stored tree
    pub fn root(&self, name: &str) -> Option<Hash> {
        self.store.root(name)
    }

    /// Forget a stored tree; returns whether it existed
    ///
    /// Its nodes stay in the store.
    pub fn drop_tree(&self, name: &str) -> Result<bool> {
        let existed = self.store.remove_root(name).is_some();
        self.store.flush()?;
        Ok(existed)
    }

    /// Flush the backing store
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    /// Flush and release the backing store
    pub fn close(self) -> Result<()> {
        self.store.flush()
    }
}

impl<S: NodeStore> std::fmt::Debug for Database<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("trees", &self.tree_names())
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Data;
    use crate::translate::{I64Translator, StringTranslator};
    use crate::ErrorKind;
    use tempfile::tempdir;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_and_reopen() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("test.pgdb");

        {
            let db = Database::create(&file).unwrap();
            let mut tree = db.tree("main", StringTranslator, I64Translator::new()).unwrap();
            tree.put(&path(&["a", "b"]), &1).unwrap();
            tree.put(&path(&["a"]), &2).unwrap();
            tree.flush().unwrap();
            drop(tree);
            db.close().unwrap();
        }

        let db = Database::open(&file).unwrap();
        assert_eq!(db.tree_names(), vec!["main".to_string()]);
        let tree = db.tree("main", StringTranslator, I64Translator::new()).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(&path(&["a", "b"])).unwrap(), Some(1));
        assert!(db.object_count() >= 3);
    }

    #[test]
    fn test_named_trees_are_independent() {
        let db = Database::in_memory();
        let mut one = db.tree("one", StringTranslator, StringTranslator).unwrap();
        let mut two = db.tree("two", StringTranslator, StringTranslator).unwrap();
        one.put(&path(&["k"]), &"1".to_string()).unwrap();
        two.put(&path(&["k"]), &"2".to_string()).unwrap();
        one.flush().unwrap();
        two.flush().unwrap();

        let reread = db.tree("one", StringTranslator, StringTranslator).unwrap();
        assert_eq!(reread.get(&path(&["k"])).unwrap(), Some("1".to_string()));
        assert_eq!(db.tree_names(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_drop_tree() {
        let db = Database::in_memory();
        let mut t = db.tree("gone", StringTranslator, StringTranslator).unwrap();
        t.put(&path(&["x"]), &"y".to_string()).unwrap();
        t.flush().unwrap();

        assert!(db.drop_tree("gone").unwrap());
        assert!(!db.drop_tree("gone").unwrap());
        assert!(db.root("gone").is_none());
        assert!(db.tree("gone", StringTranslator, StringTranslator).unwrap().is_empty());
    }

    #[test]
    fn test_typed_tree_uses_registry() {
        let mut db = Database::in_memory();
        {
            let mut t = db.typed_tree::<String, Data>("typed").unwrap();
            t.put(&path(&["a"]), &Data::from(vec![Data::from(1i64)])).unwrap();
            assert_eq!(t.len(), 1);
        }

        db.registry_mut().unregister::<Data>();
        let err = db.typed_tree::<String, Data>("typed").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
