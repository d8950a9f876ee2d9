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

/// An implementation of [`ByteSink`] appending to a [`Vec<u8>`].
///
/// # Example
/// ```
/// use bytestruct::prelude::*;
///
/// let mut bytes = Vec::new();
/// let mut sink = MemByteWriter::new(&mut bytes);
/// sink.write_all(&[0x0b, 0x80]).unwrap();
/// sink.write_all(&[0x1b]).unwrap();
/// assert_eq!(sink.len(), 3);
/// assert_eq!(bytes, [0x0b, 0x80, 0x1b]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemByteWriter<B: AsMut<Vec<u8>>> {
    data: B,
}

impl<B: AsMut<Vec<u8>> + AsRef<Vec<u8>>> MemByteWriter<B> {
    /// Create a new [`MemByteWriter`] appending to `data`.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsMut<Vec<u8>>> ByteSink for MemByteWriter<B> {
    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.data.as_mut().extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
