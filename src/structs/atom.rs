/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Enumeration of the scalar structs, with associated read and write methods.

use super::*;
use crate::traits::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
/// An enum whose variants represent the scalar structs.
///
/// Every atom reads and writes exactly one [`Value`] of the matching variant,
/// using the byte order of the stream at the time of the call.
///
/// Both [`Display`](std::fmt::Display) and [`FromStr`](std::str::FromStr) are
/// implemented for this enum in a dual way, which makes it possible to store
/// a layout as strings in a configuration file, and then parse it back.
pub enum Atom {
    Int8,
    Int16,
    Char16,
    Int32,
    Int64,
    Rat32,
    Rat64,
    Nat8,
    Nat16,
    Utf,
}

impl Atom {
    /// All atoms, in declaration order.
    pub const ALL: [Atom; 10] = [
        Atom::Int8,
        Atom::Int16,
        Atom::Char16,
        Atom::Int32,
        Atom::Int64,
        Atom::Rat32,
        Atom::Rat64,
        Atom::Nat8,
        Atom::Nat16,
        Atom::Utf,
    ];

    /// The number of bytes on the wire, or `None` for length-prefixed text.
    pub const fn size(self) -> Option<usize> {
        match self {
            Atom::Int8 | Atom::Nat8 => Some(1),
            Atom::Int16 | Atom::Char16 | Atom::Nat16 => Some(2),
            Atom::Int32 | Atom::Rat32 => Some(4),
            Atom::Int64 | Atom::Rat64 => Some(8),
            Atom::Utf => None,
        }
    }

    /// The name of the atom, which is also the [kind](Value::kind) of the
    /// values it produces.
    pub const fn name(self) -> &'static str {
        match self {
            Atom::Int8 => "int8",
            Atom::Int16 => "int16",
            Atom::Char16 => "char16",
            Atom::Int32 => "int32",
            Atom::Int64 => "int64",
            Atom::Rat32 => "rat32",
            Atom::Rat64 => "rat64",
            Atom::Nat8 => "nat8",
            Atom::Nat16 => "nat16",
            Atom::Utf => "utf",
        }
    }

    #[inline]
    pub fn read(self, read: &mut dyn ScalarRead) -> Result<Value> {
        Ok(match self {
            Atom::Int8 => Value::Int8(read.read_i8()?),
            Atom::Int16 => Value::Int16(read.read_i16()?),
            Atom::Char16 => Value::Char16(read.read_char16()?),
            Atom::Int32 => Value::Int32(read.read_i32()?),
            Atom::Int64 => Value::Int64(read.read_i64()?),
            Atom::Rat32 => Value::Rat32(read.read_f32()?),
            Atom::Rat64 => Value::Rat64(read.read_f64()?),
            Atom::Nat8 => Value::Nat8(read.read_nat8()?),
            Atom::Nat16 => Value::Nat16(read.read_nat16()?),
            Atom::Utf => Value::Text(read.read_utf()?),
        })
    }

    /// Write `value`, failing with [`StreamError::TypeMismatch`] if its kind
    /// is not the one of this atom.
    #[inline]
    pub fn write(self, write: &mut dyn ScalarWrite, value: &Value) -> Result<()> {
        match (self, value) {
            (Atom::Int8, Value::Int8(x)) => write.write_i8(*x),
            (Atom::Int16, Value::Int16(x)) => write.write_i16(*x),
            (Atom::Char16, Value::Char16(x)) => write.write_char16(*x),
            (Atom::Int32, Value::Int32(x)) => write.write_i32(*x),
            (Atom::Int64, Value::Int64(x)) => write.write_i64(*x),
            (Atom::Rat32, Value::Rat32(x)) => write.write_f32(*x),
            (Atom::Rat64, Value::Rat64(x)) => write.write_f64(*x),
            (Atom::Nat8, Value::Nat8(x)) => write.write_nat8(*x),
            (Atom::Nat16, Value::Nat16(x)) => write.write_nat16(*x),
            (Atom::Utf, Value::Text(text)) => write.write_utf(text),
            (atom, other) => Err(StreamError::TypeMismatch {
                expected: atom.name(),
                found: other.kind(),
            }),
        }
    }
}

impl core::fmt::Display for Atom {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Atom {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Atom::ALL
            .into_iter()
            .find(|atom| atom.name() == s)
            .ok_or_else(|| StreamError::UnknownAtom(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::*;
    use crate::utils::mutf8;

    #[test]
    fn test_round_trip_all() -> Result<()> {
        let values = [
            Value::Int8(-128),
            Value::Int16(-2),
            Value::Char16(0x4E2D),
            Value::Int32(0x7DCCBB7A),
            Value::Int64(i64::MIN),
            Value::Rat32(0.2),
            Value::Rat64(0.122),
            Value::Nat8(255),
            Value::Nat16(65535),
            Value::from("héllo\0"),
        ];
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let mut writer = ByteWriter::with_byte_order(MemByteWriter::new(Vec::new()), order);
            for (atom, value) in Atom::ALL.into_iter().zip(&values) {
                atom.write(&mut writer, value)?;
            }
            let data = writer.into_inner().into_inner();
            let sized: usize = Atom::ALL.iter().filter_map(|atom| atom.size()).sum();
            assert_eq!(data.len(), sized + 2 + mutf8::encoded_len("héllo\0"));

            let mut reader = ByteReader::with_byte_order(MemByteReader::new(&data), order);
            for (atom, value) in Atom::ALL.into_iter().zip(&values) {
                assert_eq!(&atom.read(&mut reader)?, value);
            }
        }
        Ok(())
    }

    #[test]
    fn test_kind_mismatch() {
        let mut writer = ByteWriter::to_vec();
        assert!(matches!(
            Atom::Int32.write(&mut writer, &Value::Int16(1)),
            Err(StreamError::TypeMismatch {
                expected: "int32",
                found: "int16"
            })
        ));
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn test_names() {
        for atom in Atom::ALL {
            assert_eq!(atom.to_string().parse::<Atom>().unwrap(), atom);
        }
        assert!(matches!("int128".parse::<Atom>(), Err(StreamError::UnknownAtom(_))));
    }
}
