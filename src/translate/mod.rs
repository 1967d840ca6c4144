//! Translation between domain values and [`Data`]
//!
//! A [`Translator`] is a stateless, reusable converter for one domain type.
//! Text encoding comes for free through the canonical JSON form of `Data`.
//! Implementations may override it with a more direct form, either for the
//! domain value (`encode`/`decode`) or for its structured value
//! (`encode_data`/`decode_data`), as long as `decode(encode(x)) == x` still
//! holds.
//!
//! ## Absence
//!
//! Plain translators never produce [`Data::Null`] and reject it on input with
//! [`Error::NullArgument`]. Wrap one in [`Nullable`] to get a translator over
//! `Option<T>` that maps `None` to `Data::Null` and back.

mod collection;
mod json;
mod primitive;
mod registry;

#[cfg(test)]
mod proptests;

pub use collection::{ListTranslator, MapTranslator};
pub use json::JsonTranslator;
pub use primitive::{
    BoolTranslator, DataTranslator, F32Translator, F64Translator, I16Translator, I32Translator,
    I64Translator, I8Translator, NumberTranslator, Numeric, StringTranslator,
};
pub use registry::{SharedTranslator, TranslatorRegistry};

use crate::codec;
use crate::model::Data;
use crate::{Error, Result};
use std::sync::Arc;

/// Bidirectional converter between a domain type and [`Data`]
pub trait Translator {
    /// The domain type
    type Value;

    /// Convert a domain value to its structured form
    fn to_data(&self, value: &Self::Value) -> Result<Data>;

    /// Convert a structured value back to the domain type
    fn from_data(&self, data: &Data) -> Result<Self::Value>;

    /// Whether `Data::Null` is a legal input (and output) of this translator
    fn accepts_null(&self) -> bool {
        false
    }

    /// Text form of the structured values this translator produces
    ///
    /// Canonical JSON unless overridden. Wrappers over another translator
    /// delegate here so an exact form chosen by the inner one is kept.
    fn encode_data(&self, data: &Data) -> Result<String> {
        codec::json::to_string(data)
    }

    /// Inverse of [`Translator::encode_data`]
    fn decode_data(&self, text: &str) -> Result<Data> {
        codec::json::from_str(text)
    }

    /// Encode a domain value as text
    fn encode(&self, value: &Self::Value) -> Result<String> {
        self.encode_data(&self.to_data(value)?)
    }

    /// Decode a domain value from text produced by [`Translator::encode`]
    fn decode(&self, text: &str) -> Result<Self::Value> {
        if text.trim().is_empty() {
            return Err(Error::null_argument("cannot decode empty text"));
        }
        self.from_data(&self.decode_data(text)?)
    }
}

impl<T: Translator + ?Sized> Translator for &T {
    type Value = T::Value;

    fn to_data(&self, value: &Self::Value) -> Result<Data> {
        (**self).to_data(value)
    }

    fn from_data(&self, data: &Data) -> Result<Self::Value> {
        (**self).from_data(data)
    }

    fn accepts_null(&self) -> bool {
        (**self).accepts_null()
    }

    fn encode_data(&self, data: &Data) -> Result<String> {
        (**self).encode_data(data)
    }

    fn decode_data(&self, text: &str) -> Result<Data> {
        (**self).decode_data(text)
    }

    fn encode(&self, value: &Self::Value) -> Result<String> {
        (**self).encode(value)
    }

    fn decode(&self, text: &str) -> Result<Self::Value> {
        (**self).decode(text)
    }
}

impl<T: Translator + ?Sized> Translator for Arc<T> {
    type Value = T::Value;

    fn to_data(&self, value: &Self::Value) -> Result<Data> {
        (**self).to_data(value)
    }

    fn from_data(&self, data: &Data) -> Result<Self::Value> {
        (**self).from_data(data)
    }

    fn accepts_null(&self) -> bool {
        (**self).accepts_null()
    }

    fn encode_data(&self, data: &Data) -> Result<String> {
        (**self).encode_data(data)
    }

    fn decode_data(&self, text: &str) -> Result<Data> {
        (**self).decode_data(text)
    }

    fn encode(&self, value: &Self::Value) -> Result<String> {
        (**self).encode(value)
    }

    fn decode(&self, text: &str) -> Result<Self::Value> {
        (**self).decode(text)
    }
}

/// Null-accepting adapter over any translator
///
/// `None` is written as `Data::Null`; `Data::Null` and empty text read back
/// as `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nullable<T>(pub T);

impl<T> Nullable<T> {
    pub fn new(inner: T) -> Self {
        Nullable(inner)
    }

    pub fn inner(&self) -> &T {
        &self.0
    }
}

impl<T: Translator> Translator for Nullable<T> {
    type Value = Option<T::Value>;

    fn to_data(&self, value: &Self::Value) -> Result<Data> {
        match value {
            Some(v) => self.0.to_data(v),
            None => Ok(Data::Null),
        }
    }

    fn from_data(&self, data: &Data) -> Result<Self::Value> {
        match data {
            Data::Null => Ok(None),
            other => self.0.from_data(other).map(Some),
        }
    }

    fn accepts_null(&self) -> bool {
        true
    }

    fn encode_data(&self, data: &Data) -> Result<String> {
        self.0.encode_data(data)
    }

    fn decode_data(&self, text: &str) -> Result<Data> {
        self.0.decode_data(text)
    }

    fn decode(&self, text: &str) -> Result<Self::Value> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.from_data(&self.decode_data(text)?)
    }
}

/// Reject `Data::Null` on behalf of a translator that does not accept it
pub(crate) fn require_present<'a>(data: &'a Data, expected: &str) -> Result<&'a Data> {
    match data {
        Data::Null => Err(Error::null_argument(format!("expected {expected}, found null"))),
        other => Ok(other),
    }
}

pub(crate) fn mismatch(expected: &str, found: &Data) -> Error {
    Error::translation(format!("expected {expected}, found {}", found.type_name()))
}
