//! # pathgraph
//!
//! Path-keyed trees with live views and a translated, persistable variant.
//!
//! A [`PathTree`] maps paths (sequences of key elements) to values, sharing
//! storage for common prefixes. Its path set, value collection and entry set
//! are live views: removing through any of them changes the tree at once.
//! Values cross into storage as [`Data`], a small structured value model,
//! by way of [`Translator`]s.
//!
//! ## Core Concepts
//!
//! - **PathTree**: the in-memory container, an index arena of nodes
//! - **Views**: [`PathSet`], [`ValueCollection`], [`EntrySet`] and their cursors
//! - **Data**: `Null | Bool | Number | Text | List | Map`, with JSON and tagged text forms
//! - **Translators**: bidirectional converters between domain types and `Data`
//! - **PersistentTree**: a `PathTree` of `Data` that flushes to a content-addressed store
//!
//! ## Example
//!
//! ```
//! use pathgraph::{Database, I64Translator, StringTranslator};
//!
//! let db = Database::in_memory();
//! let mut tree = db.tree("main", StringTranslator, I64Translator::new())?;
//! tree.put(&["a".to_string(), "b".to_string()], &5)?;
//! assert_eq!(tree.get(&["a".to_string(), "b".to_string()])?, Some(5));
//! tree.flush()?;
//! # Ok::<(), pathgraph::Error>(())
//! ```

pub mod codec;
pub mod model;
pub mod persist;
pub mod store;
pub mod translate;
pub mod trie;
pub mod view;

mod database;
mod error;

pub use database::Database;
pub use error::{Error, ErrorKind, Result};
pub use model::{Data, Hash, Number};
pub use persist::PersistentTree;
pub use store::{MemoryStore, NodeStore, ObjectStore, StoredNode};
pub use translate::{
    BoolTranslator, DataTranslator, F32Translator, F64Translator, I16Translator, I32Translator,
    I64Translator, I8Translator, JsonTranslator, ListTranslator, MapTranslator, Nullable,
    StringTranslator, Translator, TranslatorRegistry,
};
pub use trie::PathTree;
pub use view::{
    EntrySet, GrowableView, LookupView, PathSet, RemovableView, SizedView, ValueCollection,
};

/// Store file version for format compatibility
pub const VERSION: u32 = 1;

/// Magic bytes for file identification
pub const MAGIC: &[u8; 8] = b"PATHGRPH";
