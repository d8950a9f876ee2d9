/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::*;
use crate::traits::*;
use std::sync::Arc;

/// Decides, from the stream and the values already decoded by the enclosing
/// sequence, whether a conditional struct is present.
pub type ReadPredicate = Arc<dyn Fn(&mut dyn ScalarRead, &[Value]) -> Result<bool> + Send + Sync>;

/// Decides, from the value about to be written, whether a conditional struct
/// is emitted.
pub type WritePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// What to produce when the read predicate of a [`Conditional`] is false.
#[derive(Clone, Default)]
pub enum OnSkipRead {
    /// Fail with [`StreamError::UnreadableConditional`].
    #[default]
    Fail,
    /// Produce a clone of the given value.
    Default(Value),
    /// Produce the value computed from the values already decoded by the
    /// enclosing sequence.
    With(Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>),
}

/// What to do when the write predicate of a [`Conditional`] is false.
#[derive(Clone, Default)]
pub enum OnSkipWrite {
    /// Write nothing: the value is silently dropped from the output.
    #[default]
    Nothing,
    /// Write something else in place of the value.
    With(Arc<dyn Fn(&mut dyn ScalarWrite, &Value) -> Result<()> + Send + Sync>),
}

/// A struct that is present only if a predicate holds.
///
/// On read, the predicate is evaluated against the stream; if it is false,
/// the [skip policy](OnSkipRead) supplies the value (by default, failing). On
/// write, an optional predicate over the value decides whether the inner
/// struct is emitted; if it is false, the [skip policy](OnSkipWrite) runs
/// (by default, writing nothing).
///
/// # Example
/// ```
/// use bytestruct::prelude::*;
///
/// // A version byte, followed by a checksum only from version 2 on.
/// let layout = Struct::sequence([
///     Struct::from(Atom::Int8),
///     Conditional::new(Atom::Int32, |_, siblings| Ok(siblings[0] == Value::Int8(2)))
///         .or_default(Value::Int32(0))
///         .into(),
/// ]);
///
/// let mut reader = ByteReader::from_bytes([1_u8]);
/// let value = layout.read(&mut reader).unwrap();
/// assert_eq!(value.to_string(), "Composite(1|0)");
/// ```
#[derive(Clone)]
pub struct Conditional {
    inner: Struct,
    read_if: ReadPredicate,
    write_if: Option<WritePredicate>,
    on_skip_read: OnSkipRead,
    on_skip_write: OnSkipWrite,
}

impl Conditional {
    /// Wrap `inner` with a read predicate, failing on read when it is false
    /// and always writing.
    pub fn new(
        inner: impl Into<Struct>,
        read_if: impl Fn(&mut dyn ScalarRead, &[Value]) -> Result<bool> + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: inner.into(),
            read_if: Arc::new(read_if),
            write_if: None,
            on_skip_read: OnSkipRead::Fail,
            on_skip_write: OnSkipWrite::Nothing,
        }
    }

    /// Set the write predicate.
    #[must_use]
    pub fn write_if(mut self, write_if: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.write_if = Some(Arc::new(write_if));
        self
    }

    /// Set the read skip policy.
    #[must_use]
    pub fn on_skip_read(mut self, policy: OnSkipRead) -> Self {
        self.on_skip_read = policy;
        self
    }

    /// Produce `value` when the read predicate is false.
    #[must_use]
    pub fn or_default(self, value: impl Into<Value>) -> Self {
        self.on_skip_read(OnSkipRead::Default(value.into()))
    }

    /// Set the write skip policy.
    #[must_use]
    pub fn on_skip_write(mut self, policy: OnSkipWrite) -> Self {
        self.on_skip_write = policy;
        self
    }

    pub fn inner(&self) -> &Struct {
        &self.inner
    }

    pub(crate) fn read(&self, read: &mut dyn ScalarRead, siblings: &[Value]) -> Result<Value> {
        if (self.read_if)(read, siblings)? {
            return self.inner.read_in_context(read, siblings);
        }
        log::debug!("conditional skipped on read at position {}", read.position());
        match &self.on_skip_read {
            OnSkipRead::Fail => Err(StreamError::UnreadableConditional),
            OnSkipRead::Default(value) => Ok(value.clone()),
            OnSkipRead::With(produce) => produce(siblings),
        }
    }

    pub(crate) fn write(
        &self,
        write: &mut dyn ScalarWrite,
        value: &Value,
        siblings: &[Value],
    ) -> Result<()> {
        if self.write_if.as_ref().is_none_or(|write_if| write_if(value)) {
            return self.inner.write_in_context(write, value, siblings);
        }
        log::debug!("conditional skipped on write at position {}", write.position());
        match &self.on_skip_write {
            OnSkipWrite::Nothing => Ok(()),
            OnSkipWrite::With(replace) => replace(write, value),
        }
    }
}

impl OnSkipRead {
    /// Create an [`OnSkipRead::With`] from a closure.
    pub fn with(produce: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static) -> Self {
        OnSkipRead::With(Arc::new(produce))
    }
}

impl OnSkipWrite {
    /// Create an [`OnSkipWrite::With`] from a closure.
    pub fn with(
        replace: impl Fn(&mut dyn ScalarWrite, &Value) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        OnSkipWrite::With(Arc::new(replace))
    }
}

impl core::fmt::Debug for Conditional {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Conditional")
            .field("inner", &self.inner)
            .field("write_if", &self.write_if.is_some())
            .field("on_skip_read", &self.on_skip_read)
            .field("on_skip_write", &self.on_skip_write)
            .finish()
    }
}

impl core::fmt::Debug for OnSkipRead {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OnSkipRead::Fail => f.write_str("Fail"),
            OnSkipRead::Default(value) => f.debug_tuple("Default").field(value).finish(),
            OnSkipRead::With(_) => f.write_str("With(..)"),
        }
    }
}

impl core::fmt::Debug for OnSkipWrite {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OnSkipWrite::Nothing => f.write_str("Nothing"),
            OnSkipWrite::With(_) => f.write_str("With(..)"),
        }
    }
}

impl From<Conditional> for Struct {
    fn from(conditional: Conditional) -> Self {
        Struct::Conditional(Box::new(conditional))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::*;

    fn never(_: &mut dyn ScalarRead, _: &[Value]) -> Result<bool> {
        Ok(false)
    }

    #[test]
    fn test_fail_by_default() {
        let layout = Struct::from(Conditional::new(Atom::Int32, never));
        let mut reader = ByteReader::from_bytes([0_u8; 4]);
        assert!(matches!(
            layout.read(&mut reader),
            Err(StreamError::UnreadableConditional)
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_sentinel() -> Result<()> {
        let layout = Struct::from(Conditional::new(Atom::Int32, never).or_default(-1_i32));
        let mut reader = ByteReader::from_bytes([0_u8; 4]);
        assert_eq!(layout.read(&mut reader)?, Value::Int32(-1));
        assert_eq!(reader.position(), 0);
        Ok(())
    }

    #[test]
    fn test_predicate_reads_stream() -> Result<()> {
        // a presence flag precedes the optional value
        let layout = Struct::from(
            Conditional::new(Atom::Int16, |read, _| Ok(read.read_i8()? != 0))
                .on_skip_read(OnSkipRead::with(|_| Ok(Value::Int16(0)))),
        );
        let mut reader = ByteReader::from_bytes([1_u8, 0x12, 0x34, 0]);
        assert_eq!(layout.read(&mut reader)?, Value::Int16(0x1234));
        assert_eq!(layout.read(&mut reader)?, Value::Int16(0));
        assert_eq!(reader.position(), 4);
        Ok(())
    }

    #[test]
    fn test_write_skip() -> Result<()> {
        let layout = Struct::from(
            Conditional::new(Atom::Int16, never).write_if(|value| *value != Value::Int16(0)),
        );
        let mut writer = ByteWriter::to_vec();
        layout.write(&mut writer, &Value::Int16(0))?;
        assert_eq!(writer.position(), 0);
        layout.write(&mut writer, &Value::Int16(7))?;
        assert_eq!(writer.into_inner().into_inner(), [0, 7]);

        let marked = Struct::from(
            Conditional::new(Atom::Int16, never)
                .write_if(|_| false)
                .on_skip_write(OnSkipWrite::with(|write, _| write.write_i8(-1))),
        );
        let mut writer = ByteWriter::to_vec();
        marked.write(&mut writer, &Value::Int16(7))?;
        assert_eq!(writer.into_inner().into_inner(), [0xFF]);
        Ok(())
    }
}
