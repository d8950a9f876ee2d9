/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Result, StreamError};

/// The capabilities required from a concrete source of bytes (a file, a
/// socket, a slice of memory...).
///
/// Sources are allowed to deliver less than requested even when they are
/// not exhausted; [`ByteReader`](crate::impls::ByteReader) retries as needed.
pub trait ByteSource {
    /// Return the next byte, or `None` if the source is exhausted.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Read into `buf`, returning the number of bytes actually read.
    ///
    /// The count may be smaller than `buf.len()`; zero signals exhaustion.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Skip up to `n` bytes, returning the number of bytes actually skipped.
    ///
    /// Zero means that no progress is possible right now, which is not
    /// necessarily exhaustion.
    fn skip(&mut self, n: u64) -> Result<u64>;

    /// A best-effort estimate of the number of remaining bytes.
    ///
    /// Streaming sources may return zero, or a wrong value.
    fn available(&mut self) -> usize {
        0
    }

    /// Create a checkpoint at the current position, returning true if the
    /// source supports checkpoints.
    ///
    /// `read_limit` is a hint about how many bytes will be read before the
    /// matching [`reset`](ByteSource::reset).
    fn mark(&mut self, _read_limit: usize) -> Result<bool> {
        Ok(false)
    }

    /// Move back to the last checkpoint.
    ///
    /// Sources without checkpoint support must fail rather than do nothing.
    fn reset(&mut self) -> Result<()> {
        Err(StreamError::InvalidCheckpoint)
    }

    /// Move back to the very beginning of the source.
    fn rewind(&mut self) -> Result<()> {
        Err(StreamError::UnsupportedOperation("rewind"))
    }
}

/// The capabilities required from a concrete destination of bytes.
pub trait ByteSink {
    /// Write all of `buf`.
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Flush buffered bytes to the destination.
    fn flush(&mut self) -> Result<()>;

    /// Flush and release the destination. Further writes may fail.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_into(buf)
    }
    fn skip(&mut self, n: u64) -> Result<u64> {
        (**self).skip(n)
    }
    fn available(&mut self) -> usize {
        (**self).available()
    }
    fn mark(&mut self, read_limit: usize) -> Result<bool> {
        (**self).mark(read_limit)
    }
    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

impl<K: ByteSink + ?Sized> ByteSink for &mut K {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
