/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Dynamically typed values produced and consumed by [structs](super::Struct).

use crate::traits::*;
use core::fmt;

/// Number of slots shown by the [`Display`](fmt::Display) implementations of
/// [`Composite`] and [`Value::Array`].
pub const VIEWPORT: usize = 7;

/// A value read or written by a [`Struct`](super::Struct), tagged with its kind.
///
/// Scalar variants match one-to-one the [atoms](super::Atom); [`Value::Composite`]
/// is produced by sequences and [`Value::Array`] by repeated structs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Char16(Char16),
    Int32(i32),
    Int64(i64),
    Rat32(f32),
    Rat64(f64),
    Nat8(Nat8),
    Nat16(Nat16),
    Text(String),
    Composite(Composite),
    Array(Vec<Value>),
}

impl Value {
    /// The name of the kind of this value, as used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Char16(_) => "char16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Rat32(_) => "rat32",
            Value::Rat64(_) => "rat64",
            Value::Nat8(_) => "nat8",
            Value::Nat16(_) => "nat16",
            Value::Text(_) => "utf",
            Value::Composite(_) => "composite",
            Value::Array(_) => "array",
        }
    }

    /// Interpret an integral value as an element count.
    ///
    /// Fails with [`StreamError::TypeMismatch`] on non-integral values and with
    /// [`StreamError::InvalidCount`] on negative ones.
    pub fn as_count(&self) -> Result<usize> {
        let wide: i128 = match *self {
            Value::Int8(x) => x.into(),
            Value::Int16(x) => x.into(),
            Value::Char16(x) => x.into(),
            Value::Int32(x) => x.into(),
            Value::Int64(x) => x.into(),
            Value::Nat8(x) => x.into(),
            Value::Nat16(x) => x.into(),
            _ => {
                return Err(StreamError::TypeMismatch {
                    expected: "integer",
                    found: self.kind(),
                });
            }
        };
        usize::try_from(wide).map_err(|_| StreamError::InvalidCount(format!("{} is not a count", wide)))
    }
}

/// Conversion from a [`Value`] of the expected kind.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

macro_rules! impl_value_scalar {
    ($($ty:ty => $variant:ident, $name:literal);*) => {$(
        impl From<$ty> for Value {
            #[inline(always)]
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self> {
                match value {
                    Value::$variant(x) => Ok(*x),
                    other => Err(StreamError::TypeMismatch {
                        expected: $name,
                        found: other.kind(),
                    }),
                }
            }
        }
    )*};
}

impl_value_scalar!(
    i8 => Int8, "int8";
    i16 => Int16, "int16";
    i32 => Int32, "int32";
    i64 => Int64, "int64";
    f32 => Rat32, "rat32";
    f64 => Rat64, "rat64";
    Nat16 => Nat16, "nat16"
);

// Char16 and Nat8 share their representation, so both kinds are accepted.
impl FromValue for u16 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Char16(x) | Value::Nat8(x) => Ok(*x),
            other => Err(StreamError::TypeMismatch {
                expected: "char16 or nat8",
                found: other.kind(),
            }),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(text) => Ok(text.clone()),
            other => Err(StreamError::TypeMismatch {
                expected: "utf",
                found: other.kind(),
            }),
        }
    }
}

impl FromValue for Composite {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Composite(composite) => Ok(composite.clone()),
            other => Err(StreamError::TypeMismatch {
                expected: "composite",
                found: other.kind(),
            }),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            other => Err(StreamError::TypeMismatch {
                expected: "array",
                found: other.kind(),
            }),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<Composite> for Value {
    fn from(composite: Composite) -> Self {
        Value::Composite(composite)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

fn fmt_slots(f: &mut fmt::Formatter<'_>, slots: &[Value]) -> fmt::Result {
    for (i, slot) in slots.iter().take(VIEWPORT).enumerate() {
        if i != 0 {
            f.write_str("|")?;
        }
        write!(f, "{}", slot)?;
    }
    if slots.len() > VIEWPORT {
        f.write_str("|...")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(x) => write!(f, "{}", x),
            Value::Int16(x) => write!(f, "{}", x),
            Value::Char16(x) => match char::from_u32(*x as u32) {
                Some(c) => write!(f, "{:?}", c),
                None => write!(f, "\\u{{{:04x}}}", x),
            },
            Value::Int32(x) => write!(f, "{}", x),
            Value::Int64(x) => write!(f, "{}", x),
            Value::Rat32(x) => write!(f, "{}", x),
            Value::Rat64(x) => write!(f, "{}", x),
            Value::Nat8(x) => write!(f, "{}", x),
            Value::Nat16(x) => write!(f, "{}", x),
            Value::Text(text) => write!(f, "{:?}", text),
            Value::Composite(composite) => write!(f, "{}", composite),
            Value::Array(items) => {
                f.write_str("[")?;
                fmt_slots(f, items)?;
                f.write_str("]")
            }
        }
    }
}

/// A fixed-dimension heterogeneous record, addressed positionally.
///
/// Composites are produced by [sequences](super::Struct::Sequence): slot *i*
/// holds the value read by child *i*. Slots are typed at access time through
/// [`get_as`](Composite::get_as).
///
/// # Example
/// ```
/// use bytestruct::prelude::*;
///
/// let record = Composite::from(vec![Value::Int32(3), Value::from("abc")]);
/// assert_eq!(record.dims(), 2);
/// assert_eq!(record.get_as::<i32>(0).unwrap(), 3);
/// assert!(record.get_as::<i32>(1).is_err());
/// assert_eq!(record.to_string(), "Composite(3|\"abc\")");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Composite {
    slots: Vec<Value>,
}

impl Composite {
    pub fn new(slots: Vec<Value>) -> Self {
        Self { slots }
    }

    /// The number of slots.
    pub fn dims(&self) -> usize {
        self.slots.len()
    }

    /// Return slot `index`, failing with [`StreamError::MissingSlot`] if it
    /// does not exist.
    pub fn get(&self, index: usize) -> Result<&Value> {
        self.slots.get(index).ok_or(StreamError::MissingSlot(index))
    }

    /// Return slot `index` converted to `T`.
    pub fn get_as<T: FromValue>(&self, index: usize) -> Result<T> {
        T::from_value(self.get(index)?)
    }

    /// Replace slot `index`, returning the previous value.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Value> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(StreamError::MissingSlot(index))?;
        Ok(core::mem::replace(slot, value.into()))
    }

    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<Value> {
        self.slots
    }
}

impl From<Vec<Value>> for Composite {
    fn from(slots: Vec<Value>) -> Self {
        Self::new(slots)
    }
}

impl FromIterator<Value> for Composite {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl core::ops::Index<usize> for Composite {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.slots[index]
    }
}

impl fmt::Display for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Composite(")?;
        fmt_slots(f, &self.slots)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_count() {
        assert_eq!(Value::Int32(3).as_count().unwrap(), 3);
        assert_eq!(Value::Nat16(70_000).as_count().unwrap(), 70_000);
        assert!(matches!(
            Value::Int8(-1).as_count(),
            Err(StreamError::InvalidCount(_))
        ));
        assert!(matches!(
            Value::Rat32(1.0).as_count(),
            Err(StreamError::TypeMismatch { found: "rat32", .. })
        ));
    }

    #[test]
    fn test_typed_access() {
        let mut record: Composite = [Value::Char16(0x61), Value::from(vec![1_i32, 2, 3])]
            .into_iter()
            .collect();
        assert_eq!(record.get_as::<u16>(0).unwrap(), 0x61);
        assert_eq!(record.get_as::<Vec<i32>>(1).unwrap(), [1, 2, 3]);
        assert!(matches!(record.get(2), Err(StreamError::MissingSlot(2))));
        assert_eq!(record.set(0, 7_i64).unwrap(), Value::Char16(0x61));
        assert_eq!(record[0], Value::Int64(7));
        assert!(record.set(5, 0_i8).is_err());
    }

    #[test]
    fn test_viewport() {
        let record: Composite = (0..10).map(Value::Int32).collect();
        assert_eq!(record.to_string(), "Composite(0|1|2|3|4|5|6|...)");
        let array = Value::from(vec![Value::Char16(0x61), Value::Nat8(255)]);
        assert_eq!(array.to_string(), "[\'a\'|255]");
    }
}
