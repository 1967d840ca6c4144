//! Path trees that store translated values and flush to a [`NodeStore`](crate::store::NodeStore)

mod tree;
mod views;

pub use tree::PersistentTree;
pub use views::{
    TranslatedEntries, TranslatedEntry, TranslatedEntryCursor, TranslatedValueCursor,
    TranslatedValues,
};
