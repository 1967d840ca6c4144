//! Width-tagged numeric values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A number together with the width it was produced at.
///
/// The width is part of the value: `Int(5)` and `Long(5)` are different
/// numbers as far as equality and hashing go. Floats compare by bit pattern,
/// so `NaN == NaN` and `0.0 != -0.0`, which keeps `Eq` and `Hash` lawful.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Stable lowercase name of the width, also used as the tagged-form element name
    pub fn type_name(&self) -> &'static str {
        match self {
            Number::Byte(_) => "byte",
            Number::Short(_) => "short",
            Number::Int(_) => "int",
            Number::Long(_) => "long",
            Number::Float(_) => "float",
            Number::Double(_) => "double",
        }
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Number::Byte(_) | Number::Short(_) | Number::Int(_) | Number::Long(_)
        )
    }

    /// The value as an `i64`, if it is integral or a float with no fractional part
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Byte(n) => Some(n.into()),
            Number::Short(n) => Some(n.into()),
            Number::Int(n) => Some(n.into()),
            Number::Long(n) => Some(n),
            Number::Float(f) => float_to_i64(f.into()),
            Number::Double(f) => float_to_i64(f),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Byte(n) => n.into(),
            Number::Short(n) => n.into(),
            Number::Int(n) => n.into(),
            Number::Long(n) => n as f64,
            Number::Float(f) => f.into(),
            Number::Double(f) => f,
        }
    }

    fn discriminant(&self) -> u8 {
        match self {
            Number::Byte(_) => 0,
            Number::Short(_) => 1,
            Number::Int(_) => 2,
            Number::Long(_) => 3,
            Number::Float(_) => 4,
            Number::Double(_) => 5,
        }
    }

    fn bits(&self) -> u64 {
        match *self {
            Number::Byte(n) => n as u64,
            Number::Short(n) => n as u64,
            Number::Int(n) => n as u64,
            Number::Long(n) => n as u64,
            Number::Float(f) => f.to_bits().into(),
            Number::Double(f) => f.to_bits(),
        }
    }
}

fn float_to_i64(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64
    if f.fract() == 0.0 && f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0 {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.discriminant() == other.discriminant() && self.bits() == other.bits()
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.discriminant());
        state.write_u64(self.bits());
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(n) => write!(f, "{n}"),
            Number::Short(n) => write!(f, "{n}"),
            Number::Int(n) => write!(f, "{n}"),
            Number::Long(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
            Number::Double(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n)
                }
            }
        )*
    };
}

number_from!(i8 => Byte, i16 => Short, i32 => Int, i64 => Long, f32 => Float, f64 => Double);
