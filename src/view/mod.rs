//! Live views over a [`PathTree`](crate::PathTree)
//!
//! Three projections of the same tree:
//! - [`PathSet`]: the paths holding a value
//! - [`ValueCollection`]: the values, duplicates included
//! - [`EntrySet`]: `(path, value)` pairs, with write-through value replacement
//!
//! A view borrows the tree mutably. Removing through a view changes the
//! tree itself, so the effect is visible to the tree and to every view taken
//! from it afterwards. Views never grow: [`GrowableView::add`] always fails
//! with [`Error::Unsupported`](crate::Error::Unsupported).
//!
//! Capabilities are split into small traits rather than one container
//! interface: [`SizedView`], [`LookupView`], [`RemovableView`] and
//! [`GrowableView`].

mod cursor;
mod entry_set;
mod path_set;
mod values;

pub use cursor::{Entry, EntryCursor, PathCursor, ValueCursor};
pub use entry_set::EntrySet;
pub use path_set::PathSet;
pub use values::ValueCollection;

use crate::Result;

/// A view with a known number of elements
pub trait SizedView {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Membership queries answered by the backing tree
pub trait LookupView {
    type Item: ?Sized;

    fn contains(&self, item: &Self::Item) -> bool;

    fn contains_all<'q, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'q Self::Item>,
        Self::Item: 'q,
    {
        items.into_iter().all(|item| self.contains(item))
    }
}

/// Removal that writes through to the backing tree
///
/// Every method returns whether the tree changed.
pub trait RemovableView: LookupView {
    /// Remove one occurrence of `item`
    fn remove(&mut self, item: &Self::Item) -> bool;

    /// Keep only the elements for which `keep` returns true
    fn retain<F>(&mut self, keep: F) -> bool
    where
        F: FnMut(&Self::Item) -> bool;

    /// Remove every element
    fn clear(&mut self);

    /// Remove every element equal to one of `items`
    fn remove_all<'q, I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = &'q Self::Item>,
        Self::Item: PartialEq + 'q,
    {
        let items: Vec<&Self::Item> = items.into_iter().collect();
        self.retain(|x| !items.iter().any(|i| *i == x))
    }

    /// Remove every element not equal to one of `items`
    fn retain_all<'q, I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = &'q Self::Item>,
        Self::Item: PartialEq + 'q,
    {
        let items: Vec<&Self::Item> = items.into_iter().collect();
        self.retain(|x| items.iter().any(|i| *i == x))
    }
}

/// Structural addition, which the trie views reject
pub trait GrowableView<T> {
    fn add(&mut self, item: T) -> Result<bool>;

    fn add_all<I>(&mut self, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for item in items {
            changed |= self.add(item)?;
        }
        Ok(changed)
    }
}
