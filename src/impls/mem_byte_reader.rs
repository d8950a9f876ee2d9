/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`ByteSource`] for a slice, with checkpoints.
///
/// # Example
/// ```
/// use bytestruct::prelude::*;
///
/// let data = [0x01_u8, 0x02, 0x03, 0x04];
/// let mut source = MemByteReader::new(&data);
///
/// assert_eq!(source.read_byte().unwrap(), Some(0x01));
/// assert!(source.mark(0).unwrap());
/// assert_eq!(source.skip(10).unwrap(), 3);
/// assert_eq!(source.read_byte().unwrap(), None);
///
/// // back to the checkpoint
/// assert!(source.reset().is_ok());
/// assert_eq!(source.read_byte().unwrap(), Some(0x02));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteReader<B: AsRef<[u8]>> {
    data: B,
    byte_index: usize,
    checkpoint: Option<usize>,
}

impl<B: AsRef<[u8]>> MemByteReader<B> {
    /// Create a new [`MemByteReader`] from a slice of data
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            byte_index: 0,
            checkpoint: None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The index of the next byte to be read.
    pub fn byte_index(&self) -> usize {
        self.byte_index
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    #[inline(always)]
    fn remaining(&self) -> &[u8] {
        &self.data.as_ref()[self.byte_index..]
    }
}

impl MemByteReader<Vec<u8>> {
    /// Create a source holding `size` copies of `initial`.
    #[must_use]
    pub fn filled(size: usize, initial: u8) -> Self {
        Self::new(vec![initial; size])
    }

    /// Create a source holding the UTF-16 code units of `text`, big-endian.
    #[must_use]
    pub fn from_utf16(text: &str) -> Self {
        Self::new(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
    }
}

impl<B: AsRef<[u8]>> ByteSource for MemByteReader<B> {
    #[inline(always)]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.remaining().first().copied();
        if byte.is_some() {
            self.byte_index += 1;
        }
        Ok(byte)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = self.remaining();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.byte_index += n;
        Ok(n)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let n = (self.remaining().len() as u64).min(n);
        self.byte_index += n as usize;
        Ok(n)
    }

    fn available(&mut self) -> usize {
        self.remaining().len()
    }

    fn mark(&mut self, _read_limit: usize) -> Result<bool> {
        self.checkpoint = Some(self.byte_index);
        Ok(true)
    }

    fn reset(&mut self) -> Result<()> {
        self.byte_index = self.checkpoint.ok_or(StreamError::InvalidCheckpoint)?;
        Ok(())
    }

    fn rewind(&mut self) -> Result<()> {
        self.byte_index = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaustion() {
        let mut source = MemByteReader::new([1_u8, 2, 3]);
        let mut buf = [0; 8];
        assert_eq!(source.read_into(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(source.read_into(&mut buf).unwrap(), 0);
        assert_eq!(source.skip(5).unwrap(), 0);
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn test_reset_without_mark() {
        let mut source = MemByteReader::new(vec![0_u8; 4]);
        assert!(matches!(source.reset(), Err(StreamError::InvalidCheckpoint)));
        source.skip(2).unwrap();
        source.rewind().unwrap();
        assert_eq!(source.byte_index(), 0);
    }

    #[test]
    fn test_utf16() {
        let mut source = MemByteReader::from_utf16("a");
        assert_eq!(source.available(), 2);
        assert_eq!(source.read_byte().unwrap(), Some(0x00));
        assert_eq!(source.read_byte().unwrap(), Some(0x61));
    }
}
