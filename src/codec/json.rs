//! Canonical JSON form of [`Data`]
//!
//! Objects map to `Data::Map`, arrays to `Data::List`, and scalars directly.
//! JSON has a single number type, so widths do not survive a round trip:
//! integers come back as `Number::Long` and everything else as
//! `Number::Double`.

use crate::model::{Data, Number};
use crate::{Error, Result};
use serde_json::Value;

/// Convert to a `serde_json::Value`
///
/// Fails on NaN and infinities, which JSON cannot represent.
pub fn to_value(data: &Data) -> Result<Value> {
    Ok(match data {
        Data::Null => Value::Null,
        Data::Bool(b) => Value::Bool(*b),
        Data::Number(n) => Value::Number(number_to_json(n)?),
        Data::Text(s) => Value::String(s.clone()),
        Data::List(items) => Value::Array(items.iter().map(to_value).collect::<Result<Vec<_>>>()?),
        Data::Map(map) => Value::Object(
            map.iter()
                .map(|(k, v)| -> Result<(String, Value)> { Ok((k.clone(), to_value(v)?)) })
                .collect::<Result<serde_json::Map<_, _>>>()?,
        ),
    })
}

/// Convert from a `serde_json::Value`
pub fn from_value(value: Value) -> Data {
    match value {
        Value::Null => Data::Null,
        Value::Bool(b) => Data::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Data::Number(Number::Long(i)),
            // u64 beyond i64::MAX and all fractional numbers land here
            None => Data::Number(Number::Double(n.as_f64().unwrap_or(f64::NAN))),
        },
        Value::String(s) => Data::Text(s),
        Value::Array(items) => Data::List(items.into_iter().map(from_value).collect()),
        Value::Object(map) => Data::Map(map.into_iter().map(|(k, v)| (k, from_value(v))).collect()),
    }
}

/// Render as compact JSON text
pub fn to_string(data: &Data) -> Result<String> {
    Ok(serde_json::to_string(&to_value(data)?)?)
}

/// Parse JSON text
pub fn from_str(text: &str) -> Result<Data> {
    let value: Value = serde_json::from_str(text)?;
    Ok(from_value(value))
}

fn number_to_json(n: &Number) -> Result<serde_json::Number> {
    match n.is_integral() {
        true => Ok(serde_json::Number::from(n.as_i64().unwrap_or_default())),
        false => {
            let f = n.as_f64();
            serde_json::Number::from_f64(f)
                .ok_or_else(|| Error::translation(format!("cannot encode non-finite {f} as JSON")))
        }
    }
}
