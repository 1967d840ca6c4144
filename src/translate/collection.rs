//! Translators for lists and string-keyed maps

use super::{mismatch, require_present, Translator};
use crate::model::Data;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// `Vec<T>` <-> `Data::List`, translating each element with the inner translator
#[derive(Clone, Copy, Debug, Default)]
pub struct ListTranslator<T> {
    item: T,
}

impl<T> ListTranslator<T> {
    pub fn new(item: T) -> Self {
        ListTranslator { item }
    }
}

impl<T: Translator> Translator for ListTranslator<T> {
    type Value = Vec<T::Value>;

    fn to_data(&self, value: &Self::Value) -> Result<Data> {
        value
            .iter()
            .map(|v| self.item.to_data(v))
            .collect::<Result<Vec<_>>>()
            .map(Data::List)
    }

    fn from_data(&self, data: &Data) -> Result<Self::Value> {
        match require_present(data, "list")? {
            Data::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.item.from_data(item).map_err(|e| at_index(i, e)))
                .collect(),
            other => Err(mismatch("list", other)),
        }
    }

    fn encode_data(&self, data: &Data) -> Result<String> {
        self.item.encode_data(data)
    }

    fn decode_data(&self, text: &str) -> Result<Data> {
        self.item.decode_data(text)
    }
}

/// `BTreeMap<String, T>` <-> `Data::Map`
#[derive(Clone, Copy, Debug, Default)]
pub struct MapTranslator<T> {
    value: T,
}

impl<T> MapTranslator<T> {
    pub fn new(value: T) -> Self {
        MapTranslator { value }
    }
}

impl<T: Translator> Translator for MapTranslator<T> {
    type Value = BTreeMap<String, T::Value>;

    fn to_data(&self, value: &Self::Value) -> Result<Data> {
        value
            .iter()
            .map(|(k, v)| -> Result<(String, Data)> { Ok((k.clone(), self.value.to_data(v)?)) })
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Data::Map)
    }

    fn from_data(&self, data: &Data) -> Result<Self::Value> {
        match require_present(data, "map")? {
            Data::Map(map) => map
                .iter()
                .map(|(k, v)| -> Result<(String, T::Value)> {
                    let value = self.value.from_data(v).map_err(|e| at_key(k, e))?;
                    Ok((k.clone(), value))
                })
                .collect(),
            other => Err(mismatch("map", other)),
        }
    }

    fn encode_data(&self, data: &Data) -> Result<String> {
        self.value.encode_data(data)
    }

    fn decode_data(&self, text: &str) -> Result<Data> {
        self.value.decode_data(text)
    }
}

fn at_index(index: usize, err: Error) -> Error {
    match err {
        Error::Translation(msg) => Error::Translation(format!("[{index}]: {msg}")),
        Error::NullArgument(msg) => Error::NullArgument(format!("[{index}]: {msg}")),
        other => other,
    }
}

fn at_key(key: &str, err: Error) -> Error {
    match err {
        Error::Translation(msg) => Error::Translation(format!("{key:?}: {msg}")),
        Error::NullArgument(msg) => Error::NullArgument(format!("{key:?}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{I32Translator, Nullable, StringTranslator};
    use crate::ErrorKind;

    #[test]
    fn test_list_roundtrip() {
        let t = ListTranslator::new(StringTranslator);
        let value = vec!["a".to_string(), "b".to_string()];
        let data = t.to_data(&value).unwrap();
        assert_eq!(data, Data::List(vec![Data::from("a"), Data::from("b")]));
        assert_eq!(t.from_data(&data).unwrap(), value);
    }

    #[test]
    fn test_list_element_error_names_index() {
        let t = ListTranslator::new(I32Translator::new());
        let err = t
            .from_data(&Data::List(vec![Data::from(1i32), Data::from("x")]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Translation);
        assert!(err.to_string().contains("[1]"));

        let err = t.from_data(&Data::List(vec![Data::Null])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NullArgument);
    }

    #[test]
    fn test_nullable_elements() {
        let t = ListTranslator::new(Nullable(I32Translator::new()));
        let value = vec![Some(1), None];
        assert_eq!(t.from_data(&t.to_data(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_map_roundtrip() {
        let t = MapTranslator::new(I32Translator::new());
        let mut value = BTreeMap::new();
        value.insert("x".to_string(), 1);
        value.insert("y".to_string(), 2);
        let text = t.encode(&value).unwrap();
        assert_eq!(text, r#"{"x":1,"y":2}"#);
        assert_eq!(t.decode(&text).unwrap(), value);
    }

    #[test]
    fn test_map_wrong_shape() {
        let t = MapTranslator::new(I32Translator::new());
        assert_eq!(
            t.from_data(&Data::List(vec![])).unwrap_err().kind(),
            ErrorKind::Translation
        );
        let err = t.from_data(&Data::map([("k", Data::from(true))])).unwrap_err();
        assert!(err.to_string().contains("\"k\""));
    }
}
