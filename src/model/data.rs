//! Structured values - the backend-neutral form every translator targets

use super::Number;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A backend-neutral structured value
///
/// Equality and hashing are structural and recursive. Map members are kept
/// sorted by key so two maps with the same members are indistinguishable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Data {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<Data>),
    Map(BTreeMap<String, Data>),
}

impl Data {
    /// Name of the variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Data::Null => "null",
            Data::Bool(_) => "bool",
            Data::Number(n) => n.type_name(),
            Data::Text(_) => "string",
            Data::List(_) => "list",
            Data::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Data::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Data::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Data]> {
        match self {
            Data::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Data>> {
        match self {
            Data::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Build a map from key/value pairs
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Data)>,
    {
        Data::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Data {
    /// Renders the canonical JSON text form, or the tagged form when the
    /// value holds a non-finite float
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::codec::json::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str(&crate::codec::tagged::encode(self)),
        }
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Data::Bool(b)
    }
}

impl From<Number> for Data {
    fn from(n: Number) -> Self {
        Data::Number(n)
    }
}

macro_rules! data_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Data {
                fn from(n: $ty) -> Self {
                    Data::Number(Number::from(n))
                }
            }
        )*
    };
}

data_from_number!(i8, i16, i32, i64, f32, f64);

impl From<String> for Data {
    fn from(s: String) -> Self {
        Data::Text(s)
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::Text(s.to_string())
    }
}

impl From<Vec<Data>> for Data {
    fn from(items: Vec<Data>) -> Self {
        Data::List(items)
    }
}

impl From<BTreeMap<String, Data>> for Data {
    fn from(map: BTreeMap<String, Data>) -> Self {
        Data::Map(map)
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(value: Option<T>) -> Self {
        value.map_or(Data::Null, Into::into)
    }
}
