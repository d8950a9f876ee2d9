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
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// Read once from `backend`, retrying only on [`ErrorKind::Interrupted`].
fn read_some<B: Read>(backend: &mut B, buf: &mut [u8]) -> Result<usize> {
    loop {
        match backend.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// An adapter from [`Read`] and [`Write`] to [`ByteSource`] and [`ByteSink`],
/// respectively.
///
/// Instances of this struct can be created using [`ByteAdapter::new`]. They
/// turn every standard source or destination of bytes (such as
/// [`std::fs::File`], [`std::io::BufReader`], sockets, etc.) into a source or
/// destination for [`ByteReader`](crate::impls::ByteReader) and
/// [`ByteWriter`](crate::impls::ByteWriter).
///
/// Skips are performed by reading into a scratch buffer, and checkpoints
/// are not supported: [`reset`](ByteSource::reset) always fails. If the
/// backend implements [`Seek`], use a [`SeekAdapter`] instead.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct ByteAdapter<B> {
    backend: B,
}

impl<B> ByteAdapter<B> {
    /// Create a new ByteAdapter
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}

impl<B: Read> ByteSource for ByteAdapter<B> {
    #[inline(always)]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0_u8];
        Ok(match read_some(&mut self.backend, &mut byte)? {
            0 => None,
            _ => Some(byte[0]),
        })
    }

    #[inline(always)]
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        read_some(&mut self.backend, buf)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let mut scratch = [0_u8; 512];
        let len = (n.min(scratch.len() as u64)) as usize;
        Ok(read_some(&mut self.backend, &mut scratch[..len])? as u64)
    }
}

impl<B: Write> ByteSink for ByteAdapter<B> {
    #[inline(always)]
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        Ok(self.backend.write_all(buf)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.backend.flush()?)
    }
}

/// An adapter from [`Read`] + [`Seek`] to [`ByteSource`], with checkpoints.
///
/// Skips and checkpoints are implemented by seeking; as a consequence, a skip
/// past the end of the backend is clamped to its length, so that the
/// number of bytes skipped is reported correctly.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct SeekAdapter<B> {
    backend: B,
    checkpoint: Option<u64>,
}

impl<B> SeekAdapter<B> {
    /// Create a new SeekAdapter
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            checkpoint: None,
        }
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}

impl<B: Seek> SeekAdapter<B> {
    fn stream_len(&mut self) -> Result<u64> {
        let current = self.backend.stream_position()?;
        let end = self.backend.seek(SeekFrom::End(0))?;
        self.backend.seek(SeekFrom::Start(current))?;
        Ok(end)
    }

    /// The absolute offset of the backend.
    pub fn offset(&mut self) -> Result<u64> {
        Ok(self.backend.stream_position()?)
    }

    /// Move the backend to an absolute offset.
    pub fn set_offset(&mut self, offset: u64) -> Result<()> {
        self.backend.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}

impl<B: Read + Seek> ByteSource for SeekAdapter<B> {
    #[inline(always)]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0_u8];
        Ok(match read_some(&mut self.backend, &mut byte)? {
            0 => None,
            _ => Some(byte[0]),
        })
    }

    #[inline(always)]
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        read_some(&mut self.backend, buf)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let current = self.backend.stream_position()?;
        let len = self.stream_len()?;
        let target = current.saturating_add(n).min(len.max(current));
        self.backend.seek(SeekFrom::Start(target))?;
        Ok(target - current)
    }

    fn available(&mut self) -> usize {
        match (self.backend.stream_position(), self.stream_len()) {
            (Ok(current), Ok(len)) => len.saturating_sub(current) as usize,
            _ => 0,
        }
    }

    fn mark(&mut self, _read_limit: usize) -> Result<bool> {
        self.checkpoint = Some(self.backend.stream_position()?);
        Ok(true)
    }

    fn reset(&mut self) -> Result<()> {
        let checkpoint = self.checkpoint.ok_or(StreamError::InvalidCheckpoint)?;
        self.backend.seek(SeekFrom::Start(checkpoint))?;
        Ok(())
    }

    fn rewind(&mut self) -> Result<()> {
        self.backend.rewind()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_byte_adapter() {
        let mut source = ByteAdapter::new(&[1_u8, 2, 3, 4, 5][..]);
        assert_eq!(source.read_byte().unwrap(), Some(1));
        assert_eq!(source.skip(2).unwrap(), 2);
        assert!(source.mark(8).is_ok_and(|supported| !supported));
        assert!(matches!(source.reset(), Err(StreamError::InvalidCheckpoint)));
        let mut buf = [0; 4];
        assert_eq!(source.read_into(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn test_seek_adapter() {
        let mut source = SeekAdapter::new(Cursor::new(vec![1_u8, 2, 3, 4, 5]));
        assert_eq!(source.available(), 5);
        assert!(source.mark(0).unwrap());
        assert_eq!(source.skip(3).unwrap(), 3);
        assert_eq!(source.skip(10).unwrap(), 2);
        assert_eq!(source.skip(10).unwrap(), 0);
        source.reset().unwrap();
        assert_eq!(source.read_byte().unwrap(), Some(1));
        source.rewind().unwrap();
        assert_eq!(source.offset().unwrap(), 0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("test_byte_adapter");
        {
            let mut sink = ByteAdapter::new(std::fs::File::create(&path).unwrap());
            sink.write_all(&[0xCA, 0xFE]).unwrap();
            sink.close().unwrap();
        }
        let mut source = SeekAdapter::new(std::fs::File::open(&path).unwrap());
        assert_eq!(source.available(), 2);
        assert_eq!(source.read_byte().unwrap(), Some(0xCA));
        assert_eq!(source.read_byte().unwrap(), Some(0xFE));
        assert_eq!(source.read_byte().unwrap(), None);
    }
}
