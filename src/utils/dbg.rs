/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

macro_rules! dbg_reads {
    ($($ty:ty => $name:ident, $name_in:ident;)*) => {$(
        fn $name(&mut self) -> Result<$ty> {
            let value = self.reader.$name()?;
            log::debug!("{}() = {:?} @{}", stringify!($name), value, self.reader.position());
            Ok(value)
        }

        fn $name_in(&mut self, order: ByteOrder) -> Result<$ty> {
            let value = self.reader.$name_in(order)?;
            log::debug!("{}({}) = {:?} @{}", stringify!($name_in), order, value, self.reader.position());
            Ok(value)
        }
    )*};
}

macro_rules! dbg_writes {
    ($($ty:ty => $name:ident, $name_in:ident;)*) => {$(
        fn $name(&mut self, value: $ty) -> Result<()> {
            log::debug!("{}({:?}) @{}", stringify!($name), value, self.writer.position());
            self.writer.$name(value)
        }

        fn $name_in(&mut self, order: ByteOrder, value: $ty) -> Result<()> {
            log::debug!("{}({}, {:?}) @{}", stringify!($name_in), order, value, self.writer.position());
            self.writer.$name_in(order, value)
        }
    )*};
}

/// A wrapper over a scalar reader that logs all the scalars read.
///
/// Scalars are logged at the debug level, together with the position after
/// the read.
#[derive(Debug, Clone)]
pub struct DbgReader<R: ScalarRead> {
    reader: R,
}

impl<R: ScalarRead> DbgReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: ScalarRead> ByteOrdered for DbgReader<R> {
    fn byte_order(&self) -> ByteOrder {
        self.reader.byte_order()
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        log::debug!("set_byte_order({})", order);
        self.reader.set_byte_order(order)
    }
}

impl<R: ScalarRead> MarkReset for DbgReader<R> {
    fn is_marked(&self) -> bool {
        self.reader.is_marked()
    }

    fn mark(&mut self, read_limit: usize) -> Result<()> {
        log::debug!("mark({}) @{}", read_limit, self.reader.position());
        self.reader.mark(read_limit)
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.reset()?;
        log::debug!("reset() @{}", self.reader.position());
        Ok(())
    }

    fn reset_to_origin(&mut self) -> Result<()> {
        log::debug!("reset_to_origin()");
        self.reader.reset_to_origin()
    }
}

impl<R: ScalarRead> ScalarRead for DbgReader<R> {
    fn read_one_byte(&mut self) -> Result<u8> {
        self.reader.read_one_byte()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.reader.read_exact(buf)?;
        log::debug!("read_exact({}) = {}", buf.len(), n);
        Ok(n)
    }

    fn skip_exact(&mut self, n: u64) -> Result<u64> {
        let skipped = self.reader.skip_exact(n)?;
        log::debug!("skip_exact({}) = {}", n, skipped);
        Ok(skipped)
    }

    fn position(&self) -> u64 {
        self.reader.position()
    }

    fn estimate(&mut self) -> usize {
        self.reader.estimate()
    }

    fn read_wide(&mut self, byte_count: usize) -> Result<i64> {
        let value = self.reader.read_wide(byte_count)?;
        log::debug!("read_wide({}) = {:#x}", byte_count, value);
        Ok(value)
    }

    dbg_reads! {
        i8 => read_i8, read_i8_in;
        i16 => read_i16, read_i16_in;
        Char16 => read_char16, read_char16_in;
        i32 => read_i32, read_i32_in;
        i64 => read_i64, read_i64_in;
        f32 => read_f32, read_f32_in;
        f64 => read_f64, read_f64_in;
        Nat16 => read_nat16, read_nat16_in;
    }

    fn read_nat8(&mut self) -> Result<Nat8> {
        let value = self.reader.read_nat8()?;
        log::debug!("read_nat8() = {}", value);
        Ok(value)
    }

    fn read_utf(&mut self) -> Result<String> {
        let text = self.reader.read_utf()?;
        log::debug!("read_utf() = {:?}", text);
        Ok(text)
    }
}

/// A wrapper over a scalar writer that logs all the scalars written.
///
/// Scalars are logged at the debug level, together with the position before
/// the write.
#[derive(Debug, Clone)]
pub struct DbgWriter<W: ScalarWrite> {
    writer: W,
}

impl<W: ScalarWrite> DbgWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: ScalarWrite> ByteOrdered for DbgWriter<W> {
    fn byte_order(&self) -> ByteOrder {
        self.writer.byte_order()
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        log::debug!("set_byte_order({})", order);
        self.writer.set_byte_order(order)
    }
}

impl<W: ScalarWrite> ScalarWrite for DbgWriter<W> {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.writer.write_bytes(buf)
    }

    fn flush(&mut self) -> Result<()> {
        log::debug!("flush() @{}", self.writer.position());
        self.writer.flush()
    }

    fn position(&self) -> u64 {
        self.writer.position()
    }

    dbg_writes! {
        i8 => write_i8, write_i8_in;
        i16 => write_i16, write_i16_in;
        Char16 => write_char16, write_char16_in;
        i32 => write_i32, write_i32_in;
        i64 => write_i64, write_i64_in;
        f32 => write_f32, write_f32_in;
        f64 => write_f64, write_f64_in;
    }

    fn write_nat8(&mut self, value: Nat8) -> Result<()> {
        log::debug!("write_nat8({}) @{}", value, self.writer.position());
        self.writer.write_nat8(value)
    }

    fn write_nat16_in(&mut self, order: ByteOrder, value: Nat16) -> Result<()> {
        log::debug!("write_nat16_in({}, {}) @{}", order, value, self.writer.position());
        self.writer.write_nat16_in(order, value)
    }

    fn write_string(&mut self, text: &str, encoding: TextEncoding) -> Result<()> {
        log::debug!("write_string({:?}, {:?}) @{}", text, encoding, self.writer.position());
        self.writer.write_string(text, encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::*;
    use crate::structs::*;

    #[test]
    fn test_transparent() -> Result<()> {
        let layout = Struct::sequence([Struct::little_endian(int32()), nat16(), utf()]);
        let value: Value =
            Composite::from(vec![Value::Int32(-5), Value::Nat16(40_000), Value::from("dbg")]).into();

        let mut writer = DbgWriter::new(ByteWriter::to_vec());
        layout.write(&mut writer, &value)?;
        assert_eq!(writer.byte_order(), ByteOrder::LittleEndian);
        let data = writer.into_inner().into_inner().into_inner();

        let mut reader = DbgReader::new(ByteReader::from_bytes(&data));
        assert_eq!(layout.read(&mut reader)?, value);
        assert_eq!(reader.position(), data.len() as u64);
        Ok(())
    }
}
