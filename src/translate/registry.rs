//! Type-keyed registry of translators

use super::{
    BoolTranslator, DataTranslator, F32Translator, F64Translator, I16Translator, I32Translator,
    I64Translator, I8Translator, StringTranslator, Translator,
};
use crate::model::Data;
use crate::{Error, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// A translator for `T` shared out of a [`TranslatorRegistry`]
pub type SharedTranslator<T> = Arc<dyn Translator<Value = T> + Send + Sync>;
type ErasedToData = Box<dyn Fn(&dyn Any) -> Result<Data> + Send + Sync>;
type ErasedEncode = Box<dyn Fn(&dyn Any) -> Result<String> + Send + Sync>;

struct Registration {
    type_name: &'static str,
    /// A `SharedTranslator<T>` for the registered `T`
    typed: Box<dyn Any + Send + Sync>,
    /// Conversion bound to `T` when it was registered
    to_data: ErasedToData,
    encode: ErasedEncode,
}

/// Translators keyed by the Rust type they convert
///
/// This is an ordinary value: build one, hand it to whatever needs
/// to convert values of types it does not know statically, drop it when done.
/// Dispatch for a dynamically typed value is a single `TypeId` lookup.
#[derive(Default)]
pub struct TranslatorRegistry {
    entries: HashMap<TypeId, Registration>,
}

impl TranslatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding translators for `bool`, the integer and
    /// float primitives, `String` and `Data`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(BoolTranslator)
            .register(I8Translator::new())
            .register(I16Translator::new())
            .register(I32Translator::new())
            .register(I64Translator::new())
            .register(F32Translator::new())
            .register(F64Translator::new())
            .register(StringTranslator)
            .register(DataTranslator);
        registry
    }

    /// Register `translator` for its value type, replacing any earlier one
    pub fn register<Tr>(&mut self, translator: Tr) -> &mut Self
    where
        Tr: Translator + Send + Sync + 'static,
        Tr::Value: 'static,
    {
        let shared: SharedTranslator<Tr::Value> = Arc::new(translator);
        let type_name = std::any::type_name::<Tr::Value>();
        let erased = Arc::clone(&shared);
        let to_data: ErasedToData = Box::new(move |value: &dyn Any| {
            erased.to_data(downcast::<Tr::Value>(value, type_name)?)
        });
        let erased = Arc::clone(&shared);
        let encode: ErasedEncode = Box::new(move |value: &dyn Any| {
            erased.encode(downcast::<Tr::Value>(value, type_name)?)
        });
        self.entries.insert(
            TypeId::of::<Tr::Value>(),
            Registration {
                type_name,
                typed: Box::new(shared),
                to_data,
                encode,
            },
        );
        self
    }

    /// Remove the translator for `T`; returns whether one was registered
    pub fn unregister<T: 'static>(&mut self) -> bool {
        self.entries.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The translator registered for `T`
    pub fn get<T: 'static>(&self) -> Option<SharedTranslator<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|r| r.typed.downcast_ref::<SharedTranslator<T>>())
            .cloned()
    }

    /// Like [`TranslatorRegistry::get`], failing with `Unsupported` when absent
    pub fn require<T: 'static>(&self) -> Result<SharedTranslator<T>> {
        self.get::<T>().ok_or_else(|| {
            Error::unsupported(format!(
                "no translator registered for {}",
                std::any::type_name::<T>()
            ))
        })
    }

    fn registration(&self, value: &dyn Any) -> Result<&Registration> {
        self.entries
            .get(&Any::type_id(value))
            .ok_or_else(|| Error::unsupported("no translator registered for this value's type"))
    }

    /// Convert a value whose type is only known at runtime
    pub fn to_data_any(&self, value: &dyn Any) -> Result<Data> {
        (self.registration(value)?.to_data)(value)
    }

    /// Encode a value whose type is only known at runtime, in its translator's text form
    pub fn encode_any(&self, value: &dyn Any) -> Result<String> {
        (self.registration(value)?.encode)(value)
    }

    /// Translate `data` into a `T` with the registered translator
    pub fn from_data<T: 'static>(&self, data: &Data) -> Result<T> {
        self.require::<T>()?.from_data(data)
    }

    /// Names of all registered types
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|r| r.type_name).collect();
        names.sort_unstable();
        names
    }
}

fn downcast<'v, T: 'static>(value: &'v dyn Any, type_name: &str) -> Result<&'v T> {
    value
        .downcast_ref::<T>()
        .ok_or_else(|| Error::translation(format!("value is not a {type_name}")))
}

impl std::fmt::Debug for TranslatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
