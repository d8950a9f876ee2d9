/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::*;
use crate::traits::*;

/// Whether a [byte-order override](Struct::OrderOverride) leaves its order in
/// place after the inner struct has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum OrderScope {
    /// The order stays set, so every following sibling sees it.
    #[default]
    Leak,
    /// The previous order is restored on every exit path, errors included.
    Restore,
}

/// The description of the layout of a binary value.
///
/// A struct is immutable: the same description can read and write any number
/// of values, on any number of streams, also from different threads. Reading
/// and writing are symmetric: writing a value and reading back the same bytes
/// yields an equal value.
///
/// # Example
/// ```
/// use bytestruct::prelude::*;
///
/// // an i32 count followed by that many i32 elements
/// let layout = Struct::counted_array(Atom::Int32, Atom::Int32);
/// let value = Value::Composite(vec![Value::Int32(3), Value::from(vec![1_i32, 2, 3])].into());
///
/// let mut writer = ByteWriter::to_vec();
/// layout.write(&mut writer, &value).unwrap();
/// let data = writer.into_inner().into_inner();
/// assert_eq!(data.len(), 16);
///
/// let mut reader = ByteReader::from_bytes(&data);
/// assert_eq!(layout.read(&mut reader).unwrap(), value);
/// ```
#[derive(Debug, Clone)]
pub enum Struct {
    /// A single scalar, or length-prefixed text.
    Atom(Atom),
    /// Children in wire order, producing a [`Composite`] with one slot per
    /// child.
    Sequence(Vec<Struct>),
    /// Homogeneous elements, producing a [`Value::Array`]. The count is never
    /// written: it must be written by a preceding struct.
    Repeated { element: Box<Struct>, count: Count },
    /// A struct present only if a predicate holds.
    Conditional(Box<Conditional>),
    /// A struct processed with a fixed byte order.
    OrderOverride {
        order: ByteOrder,
        scope: OrderScope,
        inner: Box<Struct>,
    },
}

impl Struct {
    pub fn sequence(children: impl IntoIterator<Item = Struct>) -> Self {
        Struct::Sequence(children.into_iter().collect())
    }

    pub fn repeated(element: impl Into<Struct>, count: impl Into<Count>) -> Self {
        Struct::Repeated {
            element: Box::new(element.into()),
            count: count.into(),
        }
    }

    /// A sequence of a count and of that many elements: the resulting
    /// composite has the count in slot 0 and the array in slot 1.
    ///
    /// On write, the count in slot 0 must match the length of the array.
    pub fn counted_array(count: Atom, element: impl Into<Struct>) -> Self {
        Struct::Sequence(vec![
            Struct::Atom(count),
            Struct::repeated(element, Count::Slot(0)),
        ])
    }

    /// Override the byte order, with the given scope.
    pub fn with_order(order: ByteOrder, scope: OrderScope, inner: impl Into<Struct>) -> Self {
        Struct::OrderOverride {
            order,
            scope,
            inner: Box::new(inner.into()),
        }
    }

    /// Switch the stream to little-endian before processing `inner`, without
    /// switching it back.
    pub fn little_endian(inner: impl Into<Struct>) -> Self {
        Self::with_order(ByteOrder::LittleEndian, OrderScope::Leak, inner)
    }

    /// Switch the stream to big-endian before processing `inner`, without
    /// switching it back.
    pub fn big_endian(inner: impl Into<Struct>) -> Self {
        Self::with_order(ByteOrder::BigEndian, OrderScope::Leak, inner)
    }

    /// Process `inner` in the given byte order, restoring the previous one
    /// afterwards.
    pub fn scoped_order(order: ByteOrder, inner: impl Into<Struct>) -> Self {
        Self::with_order(order, OrderScope::Restore, inner)
    }

    /// The number of bytes of every value of this struct, if it is fixed.
    ///
    /// The size of a sequence is the sum of the sizes of its children, if
    /// they are all known; repeated and conditional structs have no fixed
    /// size.
    pub fn size(&self) -> Option<usize> {
        match self {
            Struct::Atom(atom) => atom.size(),
            Struct::Sequence(children) => children.iter().map(Struct::size).sum(),
            Struct::Repeated { .. } | Struct::Conditional(_) => None,
            Struct::OrderOverride { inner, .. } => inner.size(),
        }
    }

    /// Read a value.
    pub fn read(&self, read: &mut dyn ScalarRead) -> Result<Value> {
        self.read_in_context(read, &[])
    }

    /// Write a value.
    pub fn write(&self, write: &mut dyn ScalarWrite, value: &Value) -> Result<()> {
        self.write_in_context(write, value, &[])
    }

    /// Read a value; `siblings` are the slots already decoded by the
    /// enclosing sequence.
    pub(crate) fn read_in_context(
        &self,
        read: &mut dyn ScalarRead,
        siblings: &[Value],
    ) -> Result<Value> {
        match self {
            Struct::Atom(atom) => atom.read(read),
            Struct::Sequence(children) => {
                let mut slots = Vec::with_capacity(children.len());
                for child in children {
                    let slot = child.read_in_context(read, &slots)?;
                    slots.push(slot);
                }
                Ok(Value::Composite(Composite::new(slots)))
            }
            Struct::Repeated { element, count } => {
                let n = count.evaluate(read, siblings)?;
                log::debug!(
                    "reading {} repeated elements at position {}",
                    n,
                    read.position()
                );
                // the count comes from the wire, so it does not bound the allocation
                let mut items = Vec::with_capacity(n.min(read.estimate().max(1)));
                for _ in 0..n {
                    items.push(element.read_in_context(read, siblings)?);
                }
                Ok(Value::Array(items))
            }
            Struct::Conditional(conditional) => conditional.read(read, siblings),
            Struct::OrderOverride {
                order,
                scope,
                inner,
            } => {
                let previous = read.byte_order();
                read.set_byte_order(*order);
                let result = inner.read_in_context(read, siblings);
                if *scope == OrderScope::Restore {
                    read.set_byte_order(previous);
                }
                result
            }
        }
    }

    /// Write a value; `siblings` are the slots of the enclosing sequence
    /// preceding this struct.
    pub(crate) fn write_in_context(
        &self,
        write: &mut dyn ScalarWrite,
        value: &Value,
        siblings: &[Value],
    ) -> Result<()> {
        match self {
            Struct::Atom(atom) => atom.write(write, value),
            Struct::Sequence(children) => {
                let Value::Composite(composite) = value else {
                    return Err(StreamError::TypeMismatch {
                        expected: "composite",
                        found: value.kind(),
                    });
                };
                if composite.dims() != children.len() {
                    return Err(StreamError::ArityMismatch {
                        expected: children.len(),
                        found: composite.dims(),
                    });
                }
                let slots = composite.slots();
                for (i, (child, slot)) in children.iter().zip(slots).enumerate() {
                    // as on read, only the preceding slots are visible
                    child.write_in_context(write, slot, &slots[..i])?;
                }
                Ok(())
            }
            Struct::Repeated { element, count } => {
                let Value::Array(items) = value else {
                    return Err(StreamError::TypeMismatch {
                        expected: "array",
                        found: value.kind(),
                    });
                };
                count.check(items.len(), siblings)?;
                for item in items {
                    element.write_in_context(write, item, siblings)?;
                }
                Ok(())
            }
            Struct::Conditional(conditional) => conditional.write(write, value, siblings),
            Struct::OrderOverride {
                order,
                scope,
                inner,
            } => {
                let previous = write.byte_order();
                write.set_byte_order(*order);
                let result = inner.write_in_context(write, value, siblings);
                if *scope == OrderScope::Restore {
                    write.set_byte_order(previous);
                }
                result
            }
        }
    }
}

impl From<Atom> for Struct {
    fn from(atom: Atom) -> Self {
        Struct::Atom(atom)
    }
}

/// Read one 8-bit signed integer.
pub const fn int8() -> Struct {
    Struct::Atom(Atom::Int8)
}

/// Read one 16-bit signed integer.
pub const fn int16() -> Struct {
    Struct::Atom(Atom::Int16)
}

/// Read one UTF-16 code unit.
pub const fn char16() -> Struct {
    Struct::Atom(Atom::Char16)
}

/// Read one 32-bit signed integer.
pub const fn int32() -> Struct {
    Struct::Atom(Atom::Int32)
}

/// Read one 64-bit signed integer.
pub const fn int64() -> Struct {
    Struct::Atom(Atom::Int64)
}

/// Read one 32-bit IEEE-754 real.
pub const fn rat32() -> Struct {
    Struct::Atom(Atom::Rat32)
}

/// Read one 64-bit IEEE-754 real.
pub const fn rat64() -> Struct {
    Struct::Atom(Atom::Rat64)
}

/// Read one unsigned 8-bit quantity.
pub const fn nat8() -> Struct {
    Struct::Atom(Atom::Nat8)
}

/// Read one unsigned 16-bit quantity.
pub const fn nat16() -> Struct {
    Struct::Atom(Atom::Nat16)
}

/// Read one length-prefixed modified UTF-8 string.
pub const fn utf() -> Struct {
    Struct::Atom(Atom::Utf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::*;

    fn record() -> Struct {
        Struct::sequence([int8(), utf(), Struct::repeated(int16(), 2_usize), rat64()])
    }

    #[test]
    fn test_size() {
        assert_eq!(Struct::sequence([int8(), int32(), nat16()]).size(), Some(7));
        assert_eq!(Struct::sequence([]).size(), Some(0));
        assert_eq!(record().size(), None);
        assert_eq!(Struct::repeated(int8(), 3_usize).size(), None);
        assert_eq!(Struct::little_endian(int64()).size(), Some(8));
    }

    #[test]
    fn test_sequence_round_trip() -> Result<()> {
        let value: Value = Composite::from(vec![
            Value::Int8(1),
            Value::from("name"),
            Value::from(vec![-1_i16, 2]),
            Value::Rat64(0.5),
        ])
        .into();
        let mut writer = ByteWriter::to_vec();
        record().write(&mut writer, &value)?;
        let data = writer.into_inner().into_inner();
        assert_eq!(data.len(), 1 + 2 + 4 + 4 + 8);

        let mut reader = ByteReader::from_bytes(&data);
        assert_eq!(record().read(&mut reader)?, value);
        assert_eq!(reader.position(), data.len() as u64);
        Ok(())
    }

    #[test]
    fn test_shape_errors() {
        let mut writer = ByteWriter::to_vec();
        assert!(matches!(
            record().write(&mut writer, &Value::Int8(1)),
            Err(StreamError::TypeMismatch {
                expected: "composite",
                ..
            })
        ));
        let short = Value::Composite(vec![Value::Int8(1)].into());
        assert!(matches!(
            record().write(&mut writer, &short),
            Err(StreamError::ArityMismatch {
                expected: 4,
                found: 1
            })
        ));
        assert!(matches!(
            Struct::repeated(int8(), 2_usize).write(&mut writer, &Value::from(vec![1_i8])),
            Err(StreamError::CountMismatch {
                declared: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_forward_slot() {
        // a count must precede the elements it counts
        let layout = Struct::sequence([Struct::repeated(int8(), Count::Slot(1)), int8()]);
        let value: Value =
            Composite::from(vec![Value::from(vec![5_i8, 6]), Value::Int8(2)]).into();
        let mut writer = ByteWriter::to_vec();
        assert!(matches!(
            layout.write(&mut writer, &value),
            Err(StreamError::MissingSlot(1))
        ));
        assert_eq!(writer.position(), 0);
        assert!(matches!(
            layout.read(&mut ByteReader::from_bytes([5_u8, 6, 2])),
            Err(StreamError::MissingSlot(1))
        ));
    }

    #[test]
    fn test_scoped_order() -> Result<()> {
        let layout = Struct::sequence([
            Struct::scoped_order(ByteOrder::LittleEndian, int16()),
            int16(),
        ]);
        let mut reader = ByteReader::from_bytes([0x01_u8, 0x00, 0x00, 0x01]);
        let value = layout.read(&mut reader)?;
        assert_eq!(value.to_string(), "Composite(1|1)");
        assert_eq!(reader.byte_order(), ByteOrder::BigEndian);

        // the order is restored also on failure
        let mut reader = ByteReader::from_bytes([0x01_u8]);
        assert!(layout.read(&mut reader).is_err());
        assert_eq!(reader.byte_order(), ByteOrder::BigEndian);
        Ok(())
    }

    #[test]
    fn test_nested_counts() -> Result<()> {
        // a list of counted lists: the inner counts refer to their own sequence
        let layout = Struct::counted_array(Atom::Nat8, Struct::counted_array(Atom::Int8, char16()));
        let mut writer = ByteWriter::to_vec();
        let inner = |text: &str| -> Value {
            let units: Vec<Value> = text.encode_utf16().map(Value::Char16).collect();
            Composite::from(vec![Value::Int8(units.len() as i8), Value::Array(units)]).into()
        };
        let value: Value =
            Composite::from(vec![Value::Nat8(2), Value::Array(vec![inner("ab"), inner("")])]).into();
        layout.write(&mut writer, &value)?;
        let data = writer.into_inner().into_inner();
        assert_eq!(data, [2, 2, 0, b'a', 0, b'b', 0]);
        assert_eq!(layout.read(&mut ByteReader::from_bytes(&data))?, value);
        Ok(())
    }
}
