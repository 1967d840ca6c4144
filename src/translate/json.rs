//! Translator for any serde type

use super::{require_present, Translator};
use crate::codec;
use crate::model::Data;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Translates any `Serialize + DeserializeOwned` type through its serde JSON shape
///
/// A value that serializes to JSON `null` (a unit struct, `None`) is
/// rejected with [`Error::NullArgument`]; wrap in [`super::Nullable`] to
/// model absence instead.
pub struct JsonTranslator<T>(PhantomData<fn() -> T>);

impl<T> JsonTranslator<T> {
    pub const fn new() -> Self {
        JsonTranslator(PhantomData)
    }
}

impl<T> Default for JsonTranslator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonTranslator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JsonTranslator<T> {}

impl<T> std::fmt::Debug for JsonTranslator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsonTranslator<{}>", std::any::type_name::<T>())
    }
}

impl<T: Serialize + DeserializeOwned> Translator for JsonTranslator<T> {
    type Value = T;

    fn to_data(&self, value: &T) -> Result<Data> {
        let data = codec::json::from_value(serde_json::to_value(value)?);
        if data.is_null() {
            return Err(Error::null_argument(format!(
                "{} serialized to null",
                std::any::type_name::<T>()
            )));
        }
        Ok(data)
    }

    fn from_data(&self, data: &Data) -> Result<T> {
        let value = codec::json::to_value(require_present(data, std::any::type_name::<T>())?)?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Account {
        name: String,
        balance: i64,
        tags: Vec<String>,
    }

    #[test]
    fn test_struct_roundtrip() {
        let t = JsonTranslator::<Account>::new();
        let account = Account {
            name: "alice".into(),
            balance: 40,
            tags: vec!["vip".into()],
        };
        let data = t.to_data(&account).unwrap();
        assert_eq!(data.as_map().unwrap()["name"], Data::from("alice"));
        assert_eq!(t.from_data(&data).unwrap(), account);
        assert_eq!(t.decode(&t.encode(&account).unwrap()).unwrap(), account);
    }

    #[test]
    fn test_shape_mismatch_is_translation_error() {
        let t = JsonTranslator::<Account>::new();
        let err = t.from_data(&Data::map([("name", Data::from(1i64))])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Translation);
    }

    #[test]
    fn test_null_is_rejected() {
        let t = JsonTranslator::<Option<i32>>::new();
        assert_eq!(t.to_data(&None).unwrap_err().kind(), ErrorKind::NullArgument);
        assert_eq!(t.from_data(&Data::Null).unwrap_err().kind(), ErrorKind::NullArgument);
        assert_eq!(t.from_data(&Data::from(3i64)).unwrap(), Some(3));
    }
}
