//! Views of a [`PersistentTree`](super::PersistentTree) that decode values
//!
//! These wrap the core views over `Data` and keep their removal and cursor
//! contract. Decoding can fail, so anything that hands out or compares a
//! domain value returns a `Result`.

use crate::model::Data;
use crate::translate::Translator;
use crate::trie::{Iter, Values};
use crate::view::{
    Entry, EntryCursor, EntrySet, GrowableView, RemovableView, SizedView, ValueCollection,
    ValueCursor,
};
use crate::{Error, Result};
use std::hash::Hash;

/// Decoded counterpart of [`ValueCollection`]
pub struct TranslatedValues<'a, K, VT> {
    inner: ValueCollection<'a, K, Data>,
    translator: &'a VT,
}

impl<'a, K: Hash + Eq + Clone, VT: Translator> TranslatedValues<'a, K, VT> {
    pub(crate) fn new(inner: ValueCollection<'a, K, Data>, translator: &'a VT) -> Self {
        TranslatedValues { inner, translator }
    }

    /// Decoded values in pre-order
    pub fn iter(&self) -> impl Iterator<Item = Result<VT::Value>> + '_ {
        let translator = self.translator;
        self.inner.iter().map(move |d| translator.from_data(d))
    }

    pub fn to_vec(&self) -> Result<Vec<VT::Value>> {
        self.iter().collect()
    }

    /// The undecoded values
    pub fn raw(&self) -> Values<'_, K, Data> {
        self.inner.iter()
    }

    pub fn cursor(&mut self) -> TranslatedValueCursor<'_, K, VT> {
        TranslatedValueCursor {
            raw: self.inner.cursor(),
            translator: self.translator,
        }
    }

    pub fn contains(&self, value: &VT::Value) -> Result<bool> {
        let data = self.translator.to_data(value)?;
        Ok(self.inner.iter().any(|d| *d == data))
    }

    /// Remove the first occurrence of `value`
    pub fn remove(&mut self, value: &VT::Value) -> Result<bool> {
        let data = self.translator.to_data(value)?;
        Ok(self.inner.remove(&data))
    }

    /// Remove every occurrence of each of `values`
    pub fn remove_all<'q, I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'q VT::Value>,
        VT::Value: 'q,
    {
        let data = self.encode_all(values)?;
        Ok(self.inner.remove_all(data.iter()))
    }

    /// Remove every value not equal to one of `values`
    pub fn retain_all<'q, I>(&mut self, values: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'q VT::Value>,
        VT::Value: 'q,
    {
        let data = self.encode_all(values)?;
        Ok(self.inner.retain_all(data.iter()))
    }

    /// Keep the values for which `keep` returns true
    ///
    /// Stops at the first value that fails to decode; removals made before
    /// it stand.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<bool>
    where
        F: FnMut(&VT::Value) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Some(value) = cursor.next() {
            if !keep(&value?) {
                changed |= cursor.remove().is_ok();
            }
        }
        Ok(changed)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    fn encode_all<'q, I>(&self, values: I) -> Result<Vec<Data>>
    where
        I: IntoIterator<Item = &'q VT::Value>,
        VT::Value: 'q,
    {
        values
            .into_iter()
            .map(|v| self.translator.to_data(v))
            .collect()
    }
}

impl<K, VT> SizedView for TranslatedValues<'_, K, VT> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, VT: Translator> GrowableView<VT::Value> for TranslatedValues<'_, K, VT> {
    fn add(&mut self, _value: VT::Value) -> Result<bool> {
        Err(Error::unsupported("cannot add a value without a path"))
    }
}

/// Cursor over decoded values
pub struct TranslatedValueCursor<'a, K, VT> {
    raw: ValueCursor<'a, K, Data>,
    translator: &'a VT,
}

impl<K: Hash + Eq + Clone, VT: Translator> TranslatedValueCursor<'_, K, VT> {
    /// Advance, decoding the next value
    ///
    /// A value that fails to decode is still the current element and may be
    /// removed.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<VT::Value>> {
        let translator = self.translator;
        self.raw.next().map(|d| translator.from_data(d))
    }

    /// Remove the value last returned by `next`, returning it undecoded
    pub fn remove(&mut self) -> Result<Data> {
        self.raw.remove()
    }
}

/// Decoded counterpart of [`EntrySet`]
pub struct TranslatedEntries<'a, K, VT> {
    inner: EntrySet<'a, K, Data>,
    translator: &'a VT,
}

impl<'a, K: Hash + Eq + Clone, VT: Translator> TranslatedEntries<'a, K, VT> {
    pub(crate) fn new(inner: EntrySet<'a, K, Data>, translator: &'a VT) -> Self {
        TranslatedEntries { inner, translator }
    }

    /// Decoded entries in pre-order
    pub fn iter(&self) -> impl Iterator<Item = Result<(Vec<K>, VT::Value)>> + '_ {
        let translator = self.translator;
        self.inner
            .iter()
            .map(move |(path, d)| translator.from_data(d).map(|v| (path, v)))
    }

    pub fn to_vec(&self) -> Result<Vec<(Vec<K>, VT::Value)>> {
        self.iter().collect()
    }

    /// The undecoded entries
    pub fn raw(&self) -> Iter<'_, K, Data> {
        self.inner.iter()
    }

    pub fn cursor(&mut self) -> TranslatedEntryCursor<'_, K, VT> {
        TranslatedEntryCursor {
            raw: self.inner.cursor(),
            translator: self.translator,
        }
    }

    /// Whether `path` holds `value`
    pub fn contains(&self, path: &[K], value: &VT::Value) -> Result<bool> {
        let data = self.translator.to_data(value)?;
        Ok(self.inner.contains_entry(path, &data))
    }

    /// Remove `path` only if it holds `value`
    pub fn remove(&mut self, path: &[K], value: &VT::Value) -> Result<bool> {
        let data = self.translator.to_data(value)?;
        Ok(self.inner.remove_entry(path, &data))
    }

    /// Keep the entries for which `keep` returns true
    ///
    /// Stops at the first value that fails to decode; removals made before
    /// it stand.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<bool>
    where
        F: FnMut(&[K], &VT::Value) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while let Some(entry) = cursor.next() {
            let path = entry.path().to_vec();
            let value = entry.value()?;
            if !keep(&path, &value) {
                changed |= cursor.remove().is_ok();
            }
        }
        Ok(changed)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K, VT> SizedView for TranslatedEntries<'_, K, VT> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, VT: Translator> GrowableView<(Vec<K>, VT::Value)> for TranslatedEntries<'_, K, VT> {
    fn add(&mut self, _entry: (Vec<K>, VT::Value)) -> Result<bool> {
        Err(Error::unsupported("entries are added through the tree"))
    }
}

/// Cursor over decoded entries
pub struct TranslatedEntryCursor<'a, K, VT> {
    raw: EntryCursor<'a, K, Data>,
    translator: &'a VT,
}

impl<K: Hash + Eq + Clone, VT: Translator> TranslatedEntryCursor<'_, K, VT> {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<TranslatedEntry<'_, K, VT>> {
        let translator = self.translator;
        self.raw.next().map(|inner| TranslatedEntry { inner, translator })
    }

    /// Remove the entry last returned by `next`, returning its value undecoded
    pub fn remove(&mut self) -> Result<Data> {
        self.raw.remove()
    }
}

/// An entry whose value is decoded on access and encoded on replacement
pub struct TranslatedEntry<'c, K, VT> {
    inner: Entry<'c, K, Data>,
    translator: &'c VT,
}

impl<K, VT: Translator> TranslatedEntry<'_, K, VT> {
    pub fn path(&self) -> &[K] {
        self.inner.path()
    }

    pub fn value(&self) -> Result<VT::Value> {
        self.translator.from_data(self.inner.value())
    }

    /// Replace the stored value, returning the old one
    ///
    /// Both values are translated before the entry changes.
    pub fn set_value(&mut self, value: &VT::Value) -> Result<VT::Value> {
        let data = self.translator.to_data(value)?;
        let old = self.value()?;
        self.inner.set_value(data);
        Ok(old)
    }
}
