/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};
use std::path::Path;

/// A checkpoint of a [`ByteReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
struct Checkpoint {
    /// The position at the time of the mark.
    position: u64,
    /// Whether the source accepted to create a checkpoint of its own.
    native: bool,
}

/// An implementation of [`ScalarRead`] and [`MarkReset`] over a
/// [`ByteSource`].
///
/// Scalars are accumulated from single-byte reads; every byte consumed,
/// whether read or skipped, advances the [position](ScalarRead::position).
/// The position is not an absolute offset: it counts bytes consumed since the
/// reader was created, and is only meaningful relative to checkpoints.
///
/// # Example
/// ```
/// use bytestruct::prelude::*;
///
/// let data = [0x7D_u8, 0xCC, 0xBB, 0x7A, 0x00, 0x2A];
/// let mut reader = ByteReader::new(MemByteReader::new(&data));
///
/// reader.set_byte_order(ByteOrder::LittleEndian);
/// assert_eq!(reader.read_i32().unwrap(), 0x7ABBCC7D);
/// assert_eq!(reader.read_i16_in(ByteOrder::BigEndian).unwrap(), 42);
/// assert_eq!(reader.position(), 6);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct ByteReader<S: ByteSource> {
    source: S,
    byte_order: ByteOrder,
    position: u64,
    checkpoint: Option<Checkpoint>,
}

impl<S: ByteSource> ByteReader<S> {
    /// Create a new [`ByteReader`] in the canonical byte order.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_byte_order(source, ByteOrder::CANONICAL)
    }

    /// Create a new [`ByteReader`] in the given byte order.
    #[must_use]
    pub fn with_byte_order(source: S, byte_order: ByteOrder) -> Self {
        Self {
            source,
            byte_order,
            position: 0,
            checkpoint: None,
        }
    }

    /// Return a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    #[inline(always)]
    fn consumed(&mut self, n: u64) {
        self.position += n;
    }
}

impl<B: AsRef<[u8]>> ByteReader<MemByteReader<B>> {
    /// Create a reader over bytes in memory.
    #[must_use]
    pub fn from_bytes(data: B) -> Self {
        Self::new(MemByteReader::new(data))
    }
}

impl ByteReader<SeekAdapter<std::io::BufReader<std::fs::File>>> {
    /// Open a file for reading, with checkpoint support.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(Self::new(SeekAdapter::new(std::io::BufReader::new(file))))
    }
}

impl<S: ByteSource> ByteOrdered for ByteReader<S> {
    #[inline(always)]
    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline(always)]
    fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }
}

impl<S: ByteSource> MarkReset for ByteReader<S> {
    fn is_marked(&self) -> bool {
        self.checkpoint.is_some()
    }

    fn mark(&mut self, read_limit: usize) -> Result<()> {
        let native = self.source.mark(read_limit)?;
        log::trace!(
            "mark at position {} (native checkpoint: {})",
            self.position,
            native
        );
        self.checkpoint = Some(Checkpoint {
            position: self.position,
            native,
        });
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        match self.checkpoint.take() {
            Some(Checkpoint {
                position,
                native: true,
            }) => {
                self.source.reset()?;
                log::trace!("reset from position {} to {}", self.position, position);
                self.position = position;
                Ok(())
            }
            _ => Err(StreamError::InvalidCheckpoint),
        }
    }

    fn reset_to_origin(&mut self) -> Result<()> {
        self.source.rewind()?;
        self.position = 0;
        Ok(())
    }
}

impl<S: ByteSource> ScalarRead for ByteReader<S> {
    #[inline(always)]
    fn read_one_byte(&mut self) -> Result<u8> {
        match self.source.read_byte()? {
            Some(byte) => {
                self.consumed(1);
                Ok(byte)
            }
            None => Err(StreamError::EndOfStream {
                position: self.position,
            }),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut total = 0;
        while total < buf.len() {
            let n = self.source.read_into(&mut buf[total..])?;
            if n == 0 {
                log::trace!(
                    "source exhausted after {} of {} bytes",
                    total,
                    buf.len()
                );
                break;
            }
            total += n;
            self.consumed(n as u64);
        }
        Ok(total)
    }

    fn skip_exact(&mut self, n: u64) -> Result<u64> {
        let mut skipped = 0;
        while skipped < n {
            let step = self.source.skip(n - skipped)?;
            if step == 0 {
                log::trace!("no skip progress after {} of {} bytes", skipped, n);
                break;
            }
            let step = step.min(n - skipped);
            skipped += step;
            self.consumed(step);
        }
        Ok(skipped)
    }

    #[inline(always)]
    fn position(&self) -> u64 {
        self.position
    }

    fn estimate(&mut self) -> usize {
        self.source.available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_big_endian() -> Result<()> {
        let data = [
            0xFE_u8, // i8
            0x12, 0x34, // i16
            0x00, 0x61, // char16
            0x7D, 0xCC, 0xBB, 0x7A, // i32
            0x11, 0x00, 0xFF, 0xEE, 0xDD, 0xCC, 0xBB, 0x7A, // i64
            0xFF, // nat8
            0xFF, 0xFE, // nat16
        ];
        let mut reader = ByteReader::from_bytes(&data);
        assert_eq!(reader.read_i8()?, -2);
        assert_eq!(reader.read_i16()?, 0x1234);
        assert_eq!(reader.read_char16()?, 'a' as u16);
        assert_eq!(reader.read_i32()?, 0x7DCCBB7A);
        assert_eq!(reader.read_i64()?, 0x1100FFEEDDCCBB7A);
        assert_eq!(reader.read_nat8()?, 0xFF);
        assert_eq!(reader.read_nat16()?, 0xFFFE);
        assert_eq!(reader.position(), data.len() as u64);
        assert!(matches!(
            reader.read_i8(),
            Err(StreamError::EndOfStream { position: 20 })
        ));
        Ok(())
    }

    #[test]
    fn test_read_wide() -> Result<()> {
        let mut reader = ByteReader::from_bytes([0x01_u8, 0x02, 0x03, 0xFF, 0xFF]);
        assert_eq!(reader.read_wide(3)?, 0x010203);
        assert_eq!(reader.read_wide(2)?, 0xFFFF);
        assert_eq!(reader.read_wide(0)?, 0);
        assert!(reader.read_wide(9).is_err());
        Ok(())
    }

    #[test]
    fn test_mark_reset() -> Result<()> {
        let mut reader = ByteReader::from_bytes([1_u8, 2, 3, 4]);
        assert!(matches!(reader.reset(), Err(StreamError::InvalidCheckpoint)));
        reader.read_i8()?;
        reader.mark(2)?;
        assert!(reader.is_marked());
        assert_eq!(reader.read_i16()?, 0x0203);
        reader.reset()?;
        assert!(!reader.is_marked());
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_i8()?, 2);
        reader.reset_to_origin()?;
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_i8()?, 1);
        Ok(())
    }

    #[test]
    fn test_reset_unsupported() -> Result<()> {
        let mut reader = ByteReader::new(ByteAdapter::new(&[1_u8, 2][..]));
        reader.mark(1)?;
        assert!(reader.is_marked());
        reader.read_i8()?;
        assert!(matches!(reader.reset(), Err(StreamError::InvalidCheckpoint)));
        assert!(matches!(
            reader.reset_to_origin(),
            Err(StreamError::UnsupportedOperation(_))
        ));
        Ok(())
    }

    #[test]
    fn test_utf() -> Result<()> {
        let mut reader = ByteReader::from_bytes([0x00_u8, 0x03, b'a', 0xC0, 0x80]);
        assert_eq!(reader.read_utf()?, "a\0");

        let mut reader = ByteReader::from_bytes([0x00_u8, 0x04, b'a', b'b']);
        assert!(matches!(
            reader.read_utf(),
            Err(StreamError::EndOfStream { position: 4 })
        ));
        Ok(())
    }

    /// A source delivering two bytes per call and then failing.
    struct FailingSource {
        delivered: usize,
        fail_at: usize,
    }

    impl ByteSource for FailingSource {
        fn read_byte(&mut self) -> Result<Option<u8>> {
            Ok(None)
        }

        fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
            if self.delivered >= self.fail_at {
                return Err(StreamError::UnsupportedOperation("read_into"));
            }
            let n = buf.len().min(2);
            self.delivered += n;
            Ok(n)
        }

        fn skip(&mut self, n: u64) -> Result<u64> {
            if self.delivered >= self.fail_at {
                return Err(StreamError::UnsupportedOperation("skip"));
            }
            let n = n.min(2);
            self.delivered += n as usize;
            Ok(n)
        }
    }

    #[test]
    fn test_position_after_failure() {
        let mut reader = ByteReader::new(FailingSource {
            delivered: 0,
            fail_at: 4,
        });
        assert!(reader.read_exact(&mut [0; 8]).is_err());
        assert_eq!(reader.position(), 4);
        assert_eq!(reader.source().delivered, 4);

        let mut reader = ByteReader::new(FailingSource {
            delivered: 0,
            fail_at: 6,
        });
        assert!(reader.skip_exact(10).is_err());
        assert_eq!(reader.position(), 6);
        assert!(reader.align_to(4).is_err());
        assert_eq!(reader.position(), 6);
    }

    #[cfg(feature = "mem_dbg")]
    #[test]
    fn test_mem_size() {
        use mem_dbg::{MemSize, SizeFlags};
        let reader = ByteReader::from_bytes(vec![0_u8; 100]);
        assert!(
            reader.mem_size(SizeFlags::default())
                >= core::mem::size_of::<ByteReader<MemByteReader<Vec<u8>>>>() + 100
        );
        let writer = ByteWriter::with_capacity(16);
        assert!(
            writer.mem_size(SizeFlags::default())
                >= core::mem::size_of::<ByteWriter<MemByteWriter<Vec<u8>>>>()
        );
    }

    #[test]
    #[allow(deprecated)]
    fn test_read_boolean_disabled() {
        let mut reader = ByteReader::from_bytes([1_u8]);
        assert!(matches!(
            reader.read_boolean(),
            Err(StreamError::UnsupportedOperation(_))
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_align() -> Result<()> {
        let mut reader = ByteReader::from_bytes([0_u8; 16]);
        assert_eq!(reader.align_to(4)?, 0);
        reader.read_i8()?;
        assert_eq!(reader.align_to(4)?, 3);
        assert_eq!(reader.position(), 4);
        reader.read_i16()?;
        assert_eq!(reader.align_to(8)?, 2);
        assert_eq!(reader.read_all()?.len(), 8);
        Ok(())
    }
}
