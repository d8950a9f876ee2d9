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

/// An implementation of [`ScalarWrite`] over a [`ByteSink`].
///
/// # Example
/// ```
/// use bytestruct::prelude::*;
///
/// let mut writer = ByteWriter::to_vec();
/// writer.write_i32_in(ByteOrder::LittleEndian, 0x7DCCBB7A).unwrap();
/// writer.write_utf("ok").unwrap();
/// assert_eq!(
///     writer.into_inner().into_inner(),
///     [0x7A, 0xBB, 0xCC, 0x7D, 0x00, 0x02, b'o', b'k']
/// );
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct ByteWriter<K: ByteSink> {
    sink: K,
    byte_order: ByteOrder,
    position: u64,
}

impl<K: ByteSink> ByteWriter<K> {
    /// Create a new [`ByteWriter`] in the canonical byte order.
    #[must_use]
    pub fn new(sink: K) -> Self {
        Self::with_byte_order(sink, ByteOrder::CANONICAL)
    }

    /// Create a new [`ByteWriter`] in the given byte order.
    #[must_use]
    pub fn with_byte_order(sink: K, byte_order: ByteOrder) -> Self {
        Self {
            sink,
            byte_order,
            position: 0,
        }
    }

    /// Return a reference to the underlying sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Flush and close the underlying sink.
    pub fn close(&mut self) -> Result<()> {
        self.sink.close()
    }

    pub fn into_inner(self) -> K {
        self.sink
    }
}

impl ByteWriter<MemByteWriter<Vec<u8>>> {
    /// Create a writer accumulating bytes in memory.
    #[must_use]
    pub fn to_vec() -> Self {
        Self::new(MemByteWriter::new(Vec::new()))
    }

    /// Create a writer accumulating bytes in memory, with an initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(MemByteWriter::new(Vec::with_capacity(capacity)))
    }
}

impl ByteWriter<ByteAdapter<std::io::BufWriter<std::fs::File>>> {
    /// Create (or truncate) a file for writing.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(ByteAdapter::new(std::io::BufWriter::new(file))))
    }
}

impl<K: ByteSink> ByteOrdered for ByteWriter<K> {
    #[inline(always)]
    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline(always)]
    fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }
}

impl<K: ByteSink> ScalarWrite for ByteWriter<K> {
    #[inline(always)]
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.sink.write_all(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }

    #[inline(always)]
    fn position(&self) -> u64 {
        self.position
    }
}
