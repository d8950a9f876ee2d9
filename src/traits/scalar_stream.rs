/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::*;
use crate::utils::mutf8;
use num_traits::ToBytes;

/// Size of the chunks used by [`ScalarRead::read_all`].
const READ_ALL_CHUNK: usize = 4096;

/// Accumulate `W::BYTES` bytes read one at a time into a big-endian integer.
///
/// This is the single accumulation routine behind every scalar read; it is
/// monomorphized per width.
#[inline(always)]
pub fn accumulate<W: RawBits, R: ScalarRead + ?Sized>(read: &mut R) -> Result<W> {
    let mut acc = W::zero();
    for i in 0..core::mem::size_of::<W>() {
        if i != 0 {
            acc = acc << 8;
        }
        acc = acc | <W as From<u8>>::from(read.read_one_byte()?);
    }
    Ok(acc)
}

/// Read a scalar in the given byte order.
#[inline(always)]
pub fn read_scalar<T: Scalar, R: ScalarRead + ?Sized>(read: &mut R, order: ByteOrder) -> Result<T> {
    let bits = accumulate::<T::Bits, R>(read)?;
    Ok(T::from_bits(if order.needs_swap() {
        bits.swap()
    } else {
        bits
    }))
}

/// Write a scalar in the given byte order.
#[inline(always)]
pub fn write_scalar<T: Scalar, W: ScalarWrite + ?Sized>(
    write: &mut W,
    order: ByteOrder,
    value: T,
) -> Result<()> {
    let bits = value.to_bits();
    let bits = if order.needs_swap() { bits.swap() } else { bits };
    let bytes = bits.to_be_bytes();
    write.write_bytes(bytes.as_ref())
}

/// Save and restore the position of a stream.
///
/// Checkpoints are not reentrant: a stream holds at most one.
pub trait MarkReset {
    /// Returns true if a checkpoint is pending.
    fn is_marked(&self) -> bool;

    /// Capture the current position and ask the source for a checkpoint.
    ///
    /// `read_limit` is a hint about how many bytes will be read before
    /// [`reset`](MarkReset::reset).
    fn mark(&mut self, read_limit: usize) -> Result<()>;

    /// Move back to the last checkpoint, restoring the position captured by
    /// [`mark`](MarkReset::mark), and clear it.
    ///
    /// Fails with [`StreamError::InvalidCheckpoint`] if there is no
    /// checkpoint, or if the source cannot move back.
    fn reset(&mut self) -> Result<()>;

    /// Move back to the absolute beginning of the source, leaving the
    /// checkpoint untouched.
    fn reset_to_origin(&mut self) -> Result<()>;

    /// Mark, run `op`, and reset, whatever the outcome of `op`.
    ///
    /// Returns the result of `op`; if `op` succeeded but the reset failed,
    /// returns the reset error. Only the position is restored: bytes consumed
    /// from a non-rewindable collaborator are not given back.
    ///
    /// Since checkpoints are not reentrant, calling this method on a stream
    /// that is already marked fails with [`StreamError::InvalidCheckpoint`]
    /// without running `op`.
    fn scoped<T, F>(&mut self, read_limit: usize, op: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.is_marked() {
            return Err(StreamError::InvalidCheckpoint);
        }
        self.mark(read_limit)?;
        let result = op(self);
        let reset = self.reset();
        match (result, reset) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), reset) => {
                if let Err(reset_err) = reset {
                    log::warn!("Reset after failed scoped operation also failed: {}", reset_err);
                }
                Err(err)
            }
        }
    }
}

macro_rules! scalar_reads {
    ($($(#[$doc:meta])* $ty:ty => $name:ident, $name_in:ident;)*) => {$(
        $(#[$doc])*
        #[inline]
        fn $name(&mut self) -> Result<$ty> {
            let order = self.byte_order();
            read_scalar(self, order)
        }

        $(#[$doc])*
        ///
        /// The byte order is given explicitly instead of being taken from the stream.
        #[inline]
        fn $name_in(&mut self, order: ByteOrder) -> Result<$ty> {
            read_scalar(self, order)
        }
    )*};
}

/// Endianness-aware scalar reads over a byte stream, with position bookkeeping.
///
/// Implementors provide the accumulating byte-level operations; every scalar
/// read is derived from [`read_one_byte`](ScalarRead::read_one_byte) through
/// [`accumulate`]. Each scalar read exists in two forms: one using the
/// stream's [byte order](ByteOrdered::byte_order), and one (suffixed `_in`)
/// taking the order as a parameter.
///
/// This trait is object safe, so that closures in
/// [structs](crate::structs::Struct) can receive a `&mut dyn ScalarRead`.
pub trait ScalarRead: ByteOrdered + MarkReset {
    /// Read a single byte, failing with [`StreamError::EndOfStream`] if the
    /// source is exhausted.
    fn read_one_byte(&mut self) -> Result<u8>;

    /// Fill `buf` as much as possible, retrying short reads until the source
    /// reports exhaustion, and return the number of bytes read.
    ///
    /// The result is smaller than `buf.len()` only if the source was exhausted.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Skip `n` bytes, retrying short skips until a single attempt makes no
    /// progress, and return the number of bytes skipped.
    fn skip_exact(&mut self, n: u64) -> Result<u64>;

    /// The number of bytes consumed (read or skipped) so far.
    fn position(&self) -> u64;

    /// A best-effort estimate of the number of bytes left.
    fn estimate(&mut self) -> usize;

    /// Like [`read_exact`](ScalarRead::read_exact), but fails with
    /// [`StreamError::ShortTransfer`] on truncation.
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        let actual = self.read_exact(buf)?;
        if actual != buf.len() {
            return Err(StreamError::ShortTransfer {
                requested: buf.len() as u64,
                actual: actual as u64,
            });
        }
        Ok(())
    }

    /// Accumulate `byte_count` bytes, most significant first, into an integer.
    ///
    /// No sign extension is performed, so the result is negative only if
    /// `byte_count` is eight and the first byte has its highest bit set.
    fn read_wide(&mut self, byte_count: usize) -> Result<i64> {
        if byte_count > 8 {
            return Err(StreamError::ValueOutOfRange {
                value: byte_count as i128,
                target: "byte count of an i64",
            });
        }
        let mut acc = 0_i64;
        for _ in 0..byte_count {
            acc = (acc << 8) | self.read_one_byte()? as i64;
        }
        Ok(acc)
    }

    scalar_reads! {
        /// Read an 8-bit signed integer.
        i8 => read_i8, read_i8_in;
        /// Read a 16-bit signed integer.
        i16 => read_i16, read_i16_in;
        /// Read a UTF-16 code unit.
        Char16 => read_char16, read_char16_in;
        /// Read a 32-bit signed integer.
        i32 => read_i32, read_i32_in;
        /// Read a 64-bit signed integer.
        i64 => read_i64, read_i64_in;
        /// Read a 32-bit IEEE-754 real.
        f32 => read_f32, read_f32_in;
        /// Read a 64-bit IEEE-754 real.
        f64 => read_f64, read_f64_in;
    }

    /// Read an unsigned 8-bit quantity.
    fn read_nat8(&mut self) -> Result<Nat8> {
        Ok(self.read_i8()? as u8 as Nat8)
    }

    /// Read an unsigned 16-bit quantity.
    fn read_nat16(&mut self) -> Result<Nat16> {
        let order = self.byte_order();
        self.read_nat16_in(order)
    }

    /// Read an unsigned 16-bit quantity in the given byte order.
    fn read_nat16_in(&mut self, order: ByteOrder) -> Result<Nat16> {
        Ok(self.read_i16_in(order)? as u16 as Nat16)
    }

    /// Read text in the length-prefixed modified UTF-8 encoding: a big-endian
    /// 16-bit byte length followed by that many bytes.
    ///
    /// This is the only text decoding available: the raw
    /// [`Bytes`](TextEncoding::Bytes) and [`Chars`](TextEncoding::Chars) dumps
    /// of [`ScalarWrite::write_string`] carry no length, so reading them back
    /// is left to the enclosing format.
    ///
    /// A body cut short by the end of the source fails with
    /// [`StreamError::EndOfStream`], as any other truncated scalar.
    fn read_utf(&mut self) -> Result<String> {
        let len = read_scalar::<u16, _>(self, ByteOrder::CANONICAL)? as usize;
        let mut buf = vec![0; len];
        if self.read_exact(&mut buf)? != len {
            return Err(StreamError::EndOfStream {
                position: self.position(),
            });
        }
        mutf8::decode(&buf)
    }

    /// Booleans are not scalars of this codec: read a byte and compare it
    /// with zero instead.
    #[deprecated(note = "read a byte with `read_i8` and compare it with zero")]
    fn read_boolean(&mut self) -> Result<bool> {
        Err(StreamError::UnsupportedOperation("read_boolean"))
    }

    /// Read exactly `n` bytes.
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0; n];
        self.read_fully(&mut buf)?;
        Ok(buf)
    }

    /// Read until the source is exhausted.
    fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.estimate());
        loop {
            let start = data.len();
            data.resize(start + READ_ALL_CHUNK, 0);
            let actual = self.read_exact(&mut data[start..])?;
            data.truncate(start + actual);
            if actual < READ_ALL_CHUNK {
                return Ok(data);
            }
        }
    }

    /// Skip to the next position that is a multiple of `alignment`,
    /// returning the number of bytes skipped.
    fn align_to(&mut self, alignment: u64) -> Result<u64> {
        if alignment == 0 {
            return Ok(0);
        }
        let padding = (alignment - self.position() % alignment) % alignment;
        self.skip_exact(padding)
    }

    /// Read a scalar of any type using the stream's byte order.
    fn read<T: Scalar>(&mut self) -> Result<T>
    where
        Self: Sized,
    {
        let order = self.byte_order();
        read_scalar(self, order)
    }

    /// Read a scalar of any type in the given byte order.
    fn read_in<T: Scalar>(&mut self, order: ByteOrder) -> Result<T>
    where
        Self: Sized,
    {
        read_scalar(self, order)
    }

    /// Read a scalar of any type in a statically selected byte order.
    fn read_as<E: Endianness, T: Scalar>(&mut self) -> Result<T>
    where
        Self: Sized,
    {
        read_scalar(self, E::ORDER)
    }

    /// Read `n` items with `read_item`.
    fn read_many<T, F>(&mut self, n: usize, mut read_item: F) -> Result<Vec<T>>
    where
        Self: Sized,
        F: FnMut(&mut Self) -> Result<T>,
    {
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(read_item(self)?);
        }
        Ok(items)
    }
}

/// The text encodings available to [`ScalarWrite::write_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    /// The low byte of every UTF-16 code unit, with no delimiter. Lossy for
    /// code units above `0xFF`.
    Bytes,
    /// Every UTF-16 code unit as two big-endian bytes, with no delimiter.
    Chars,
    /// A big-endian 16-bit byte length followed by modified UTF-8; the only
    /// encoding [`ScalarRead::read_utf`] can read back.
    #[default]
    Utf,
}

macro_rules! scalar_writes {
    ($($(#[$doc:meta])* $ty:ty => $name:ident, $name_in:ident;)*) => {$(
        $(#[$doc])*
        #[inline]
        fn $name(&mut self, value: $ty) -> Result<()> {
            let order = self.byte_order();
            write_scalar(self, order, value)
        }

        $(#[$doc])*
        ///
        /// The byte order is given explicitly instead of being taken from the stream.
        #[inline]
        fn $name_in(&mut self, order: ByteOrder, value: $ty) -> Result<()> {
            write_scalar(self, order, value)
        }
    )*};
}

/// Endianness-aware scalar writes over a byte sink.
///
/// The mirror of [`ScalarRead`]: no accumulation is needed, as every scalar
/// is converted to its big-endian bytes (swapped first if needed) and handed
/// to [`write_bytes`](ScalarWrite::write_bytes) in one go.
pub trait ScalarWrite: ByteOrdered {
    /// Write all of `buf`.
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;

    /// Flush the underlying sink.
    fn flush(&mut self) -> Result<()>;

    /// The number of bytes written so far.
    fn position(&self) -> u64;

    scalar_writes! {
        /// Write an 8-bit signed integer.
        i8 => write_i8, write_i8_in;
        /// Write a 16-bit signed integer.
        i16 => write_i16, write_i16_in;
        /// Write a UTF-16 code unit.
        Char16 => write_char16, write_char16_in;
        /// Write a 32-bit signed integer.
        i32 => write_i32, write_i32_in;
        /// Write a 64-bit signed integer.
        i64 => write_i64, write_i64_in;
        /// Write a 32-bit IEEE-754 real.
        f32 => write_f32, write_f32_in;
        /// Write a 64-bit IEEE-754 real.
        f64 => write_f64, write_f64_in;
    }

    /// Write an unsigned 8-bit quantity, failing if it does not fit in a byte.
    fn write_nat8(&mut self, value: Nat8) -> Result<()> {
        let byte = u8::try_from(value).map_err(|_| StreamError::ValueOutOfRange {
            value: value as i128,
            target: "nat8",
        })?;
        self.write_i8(byte as i8)
    }

    /// Write an unsigned 16-bit quantity, failing if it does not fit in two bytes.
    fn write_nat16(&mut self, value: Nat16) -> Result<()> {
        let order = self.byte_order();
        self.write_nat16_in(order, value)
    }

    /// Write an unsigned 16-bit quantity in the given byte order.
    fn write_nat16_in(&mut self, order: ByteOrder, value: Nat16) -> Result<()> {
        let half = u16::try_from(value).map_err(|_| StreamError::ValueOutOfRange {
            value: value as i128,
            target: "nat16",
        })?;
        self.write_i16_in(order, half as i16)
    }

    /// Write text in the given encoding.
    ///
    /// The raw encodings ignore the stream's byte order, and only
    /// [`TextEncoding::Utf`] can be read back by [`ScalarRead::read_utf`].
    fn write_string(&mut self, text: &str, encoding: TextEncoding) -> Result<()> {
        match encoding {
            TextEncoding::Bytes => {
                let bytes: Vec<u8> = text.encode_utf16().map(|unit| unit as u8).collect();
                self.write_bytes(&bytes)
            }
            TextEncoding::Chars => {
                let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
                self.write_bytes(&bytes)
            }
            TextEncoding::Utf => {
                let bytes = mutf8::encode(text);
                let len = u16::try_from(bytes.len()).map_err(|_| StreamError::ValueOutOfRange {
                    value: bytes.len() as i128,
                    target: "length prefix of modified UTF-8 text",
                })?;
                write_scalar(self, ByteOrder::CANONICAL, len)?;
                self.write_bytes(&bytes)
            }
        }
    }

    /// Write text in the length-prefixed modified UTF-8 encoding.
    fn write_utf(&mut self, text: &str) -> Result<()> {
        self.write_string(text, TextEncoding::Utf)
    }

    /// Write a scalar of any type using the stream's byte order.
    fn write<T: Scalar>(&mut self, value: T) -> Result<()>
    where
        Self: Sized,
    {
        let order = self.byte_order();
        write_scalar(self, order, value)
    }

    /// Write a scalar of any type in the given byte order.
    fn write_in<T: Scalar>(&mut self, order: ByteOrder, value: T) -> Result<()>
    where
        Self: Sized,
    {
        write_scalar(self, order, value)
    }

    /// Write a scalar of any type in a statically selected byte order.
    fn write_as<E: Endianness, T: Scalar>(&mut self, value: T) -> Result<()>
    where
        Self: Sized,
    {
        write_scalar(self, E::ORDER, value)
    }
}
