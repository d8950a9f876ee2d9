/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::*;
use crate::traits::*;
use std::sync::Arc;

/// A function computing the number of elements of a repeated struct from the
/// stream and the values already decoded by the enclosing sequence.
pub type CountFn = Arc<dyn Fn(&mut dyn ScalarRead, &[Value]) -> Result<usize> + Send + Sync>;

/// How a [repeated struct](Struct::Repeated) determines its number of elements.
#[derive(Clone)]
pub enum Count {
    /// A number of elements known when the layout is built.
    Fixed(usize),
    /// The integral value in the given slot of the enclosing sequence, which
    /// must precede the repeated struct.
    Slot(usize),
    /// An arbitrary function evaluated at read time. It may consume bytes.
    Dynamic(CountFn),
}

impl Count {
    /// Create a [`Count::Dynamic`] from a closure.
    pub fn dynamic(
        count: impl Fn(&mut dyn ScalarRead, &[Value]) -> Result<usize> + Send + Sync + 'static,
    ) -> Self {
        Count::Dynamic(Arc::new(count))
    }

    /// Compute the number of elements to read.
    pub fn evaluate(&self, read: &mut dyn ScalarRead, siblings: &[Value]) -> Result<usize> {
        match self {
            Count::Fixed(n) => Ok(*n),
            Count::Slot(index) => sibling(siblings, *index)?.as_count(),
            Count::Dynamic(count) => count(read, siblings),
        }
    }

    /// Check that `actual` elements can be written.
    ///
    /// Fixed and slot counts must match exactly, as a mismatch would make the
    /// output unreadable; dynamic counts are opaque and always accepted.
    pub fn check(&self, actual: usize, siblings: &[Value]) -> Result<()> {
        let declared = match self {
            Count::Fixed(n) => *n,
            Count::Slot(index) => sibling(siblings, *index)?.as_count()?,
            Count::Dynamic(_) => return Ok(()),
        };
        if declared != actual {
            return Err(StreamError::CountMismatch { declared, actual });
        }
        Ok(())
    }
}

fn sibling(siblings: &[Value], index: usize) -> Result<&Value> {
    siblings.get(index).ok_or(StreamError::MissingSlot(index))
}

impl core::fmt::Debug for Count {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Count::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
            Count::Slot(index) => f.debug_tuple("Slot").field(index).finish(),
            Count::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<usize> for Count {
    fn from(n: usize) -> Self {
        Count::Fixed(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::*;

    #[test]
    fn test_evaluate() -> Result<()> {
        let mut reader = ByteReader::from_bytes([0_u8, 0, 0, 5]);
        let siblings = [Value::Int8(2), Value::Rat32(1.0)];
        assert_eq!(Count::Fixed(4).evaluate(&mut reader, &siblings)?, 4);
        assert_eq!(Count::Slot(0).evaluate(&mut reader, &siblings)?, 2);
        assert!(matches!(
            Count::Slot(1).evaluate(&mut reader, &siblings),
            Err(StreamError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Count::Slot(2).evaluate(&mut reader, &siblings),
            Err(StreamError::MissingSlot(2))
        ));
        let prefixed = Count::dynamic(|read, _| Ok(read.read_i32()? as usize));
        assert_eq!(prefixed.evaluate(&mut reader, &siblings)?, 5);
        assert_eq!(reader.position(), 4);
        Ok(())
    }

    #[test]
    fn test_check() {
        let siblings = [Value::Nat16(3)];
        assert!(Count::Fixed(3).check(3, &siblings).is_ok());
        assert!(Count::Slot(0).check(3, &siblings).is_ok());
        assert!(matches!(
            Count::Slot(0).check(2, &siblings),
            Err(StreamError::CountMismatch {
                declared: 3,
                actual: 2
            })
        ));
        assert!(Count::dynamic(|_, _| Ok(0)).check(99, &siblings).is_ok());
    }
}
