//! Translators for scalar types

use super::{mismatch, require_present, Translator};
use crate::codec::tagged;
use crate::model::{Data, Number};
use crate::{Error, Result};
use std::marker::PhantomData;

/// `bool` <-> `Data::Bool`; also reads the text `"true"` / `"false"`
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolTranslator;

impl Translator for BoolTranslator {
    type Value = bool;

    fn to_data(&self, value: &bool) -> Result<Data> {
        Ok(Data::Bool(*value))
    }

    fn from_data(&self, data: &Data) -> Result<bool> {
        match require_present(data, "bool")? {
            Data::Bool(b) => Ok(*b),
            Data::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::translation(format!("{s:?} is not a bool"))),
            other => Err(mismatch("bool", other)),
        }
    }
}

/// A Rust numeric type a [`NumberTranslator`] can target
pub trait Numeric: Copy + Into<Number> + std::str::FromStr {
    const NAME: &'static str;

    /// Narrow a number of any width, `None` if it does not fit
    fn from_number(n: &Number) -> Option<Self>;
}

macro_rules! integer_numeric {
    ($($ty:ty => $name:literal),*) => {
        $(
            impl Numeric for $ty {
                const NAME: &'static str = $name;

                fn from_number(n: &Number) -> Option<Self> {
                    n.as_i64().and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

integer_numeric!(i8 => "byte", i16 => "short", i32 => "int", i64 => "long");

impl Numeric for f32 {
    const NAME: &'static str = "float";

    fn from_number(n: &Number) -> Option<Self> {
        let f = n.as_f64();
        if f.is_finite() && f.abs() > f64::from(f32::MAX) {
            None
        } else {
            Some(f as f32)
        }
    }
}

impl Numeric for f64 {
    const NAME: &'static str = "double";

    fn from_number(n: &Number) -> Option<Self> {
        Some(n.as_f64())
    }
}

/// Numeric translator, writing at the width of `T`
///
/// Reads numbers of any width as long as the value fits `T` exactly, and
/// numeric text. Out-of-range input is a translation error.
pub struct NumberTranslator<T>(PhantomData<fn() -> T>);

impl<T> NumberTranslator<T> {
    pub const fn new() -> Self {
        NumberTranslator(PhantomData)
    }
}

impl<T> Default for NumberTranslator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NumberTranslator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NumberTranslator<T> {}

impl<T> std::fmt::Debug for NumberTranslator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NumberTranslator<{}>", std::any::type_name::<T>())
    }
}

impl<T: Numeric> Translator for NumberTranslator<T> {
    type Value = T;

    fn to_data(&self, value: &T) -> Result<Data> {
        Ok(Data::Number((*value).into()))
    }

    fn from_data(&self, data: &Data) -> Result<T> {
        match require_present(data, T::NAME)? {
            Data::Number(n) => T::from_number(n).ok_or_else(|| {
                Error::translation(format!("{n} is out of range for {}", T::NAME))
            }),
            Data::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::translation(format!("{s:?} is not a valid {}", T::NAME))),
            other => Err(mismatch(T::NAME, other)),
        }
    }
}

pub type I8Translator = NumberTranslator<i8>;
pub type I16Translator = NumberTranslator<i16>;
pub type I32Translator = NumberTranslator<i32>;
pub type I64Translator = NumberTranslator<i64>;
pub type F32Translator = NumberTranslator<f32>;
pub type F64Translator = NumberTranslator<f64>;

/// `String` <-> `Data::Text`
///
/// Text encoding is the string itself rather than a quoted JSON literal, so
/// an empty string encodes to empty text and decodes back to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringTranslator;

impl Translator for StringTranslator {
    type Value = String;

    fn to_data(&self, value: &String) -> Result<Data> {
        Ok(Data::Text(value.clone()))
    }

    fn from_data(&self, data: &Data) -> Result<String> {
        match require_present(data, "string")? {
            Data::Text(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }

    fn encode(&self, value: &String) -> Result<String> {
        Ok(value.clone())
    }

    fn decode(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Identity translator over `Data` itself (rejects `Data::Null`)
///
/// Its text form is the tagged one, so numeric widths survive `encode`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataTranslator;

impl Translator for DataTranslator {
    type Value = Data;

    fn to_data(&self, value: &Data) -> Result<Data> {
        require_present(value, "a value").cloned()
    }

    fn from_data(&self, data: &Data) -> Result<Data> {
        require_present(data, "a value").cloned()
    }

    fn encode_data(&self, data: &Data) -> Result<String> {
        Ok(tagged::encode(data))
    }

    fn decode_data(&self, text: &str) -> Result<Data> {
        tagged::decode(text)
    }
}
