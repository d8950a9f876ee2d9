/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// The byte order of multi-byte values on the wire.
///
/// Two values are distinguished: [`ByteOrder::CANONICAL`], the order in which
/// multi-byte scalars are transmitted by default (always big-endian), and
/// [`ByteOrder::HOST`], the order of the executing machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum ByteOrder {
    /// Most significant byte first.
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// The default order of every stream: most significant byte first.
    pub const CANONICAL: ByteOrder = ByteOrder::BigEndian;

    /// The order of the executing machine.
    ///
    /// It is computed by probing how the pattern `0x00FF` is laid out in
    /// memory: if its first byte is `0xFF`, the machine is little-endian.
    pub const HOST: ByteOrder = Self::probe();

    const fn probe() -> ByteOrder {
        let layout = 0x00FF_u16.to_ne_bytes();
        if layout[0] == 0xFF {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    /// Returns the opposite order.
    #[must_use]
    pub const fn reversed(self) -> ByteOrder {
        match self {
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
        }
    }

    /// Returns true if values in this order must be swapped to and from the
    /// canonical order.
    #[inline(always)]
    #[must_use]
    pub const fn needs_swap(self) -> bool {
        !matches!(
            (self, Self::CANONICAL),
            (ByteOrder::BigEndian, ByteOrder::BigEndian)
                | (ByteOrder::LittleEndian, ByteOrder::LittleEndian)
        )
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl core::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteOrder::BigEndian => f.write_str("big-endian"),
            ByteOrder::LittleEndian => f.write_str("little-endian"),
        }
    }
}

/// Streams carrying a mutable byte order.
///
/// The byte order is ambient, per-stream state: it is the default used by
/// every scalar operation that does not specify an order explicitly. Nothing
/// in this crate stacks or restores it implicitly; callers that need the
/// previous order back must save it themselves.
pub trait ByteOrdered {
    /// The byte order currently used by default.
    fn byte_order(&self) -> ByteOrder;

    /// Change the default byte order.
    fn set_byte_order(&mut self, order: ByteOrder);

    /// Returns true if scalars must be swapped under the current order.
    #[inline(always)]
    fn should_swap(&self) -> bool {
        self.byte_order().needs_swap()
    }

    #[inline(always)]
    fn is_canonical_order(&self) -> bool {
        self.byte_order() == ByteOrder::CANONICAL
    }

    #[inline(always)]
    fn is_host_order(&self) -> bool {
        self.byte_order() == ByteOrder::HOST
    }

    /// Switch to the order of the executing machine.
    fn use_host_order(&mut self) {
        self.set_byte_order(ByteOrder::HOST);
    }

    /// Switch back to the canonical (big-endian) order.
    fn use_canonical_order(&mut self) {
        self.set_byte_order(ByteOrder::CANONICAL);
    }
}

/// Inner private trait used to make implementing [`Endianness`]
/// impossible for other structs.
mod private {
    /// This is a [SealedTrait](https://predr.ag/blog/definitive-guide-to-sealed-traits-in-rust/).
    pub trait Endianness {
        const SEALED_ORDER: super::ByteOrder;
    }
}

/// Marker trait for endianness selector types.
///
/// Its only implementations are [`LittleEndian`] and [`BigEndian`]; they make
/// it possible to select a byte order statically, e.g., in
/// [`ScalarRead::read_as`](crate::traits::ScalarRead::read_as).
pub trait Endianness: private::Endianness {
    /// The runtime value corresponding to this selector.
    const ORDER: ByteOrder;
}

impl<T: private::Endianness> Endianness for T {
    const ORDER: ByteOrder = T::SEALED_ORDER;
}

/// Selector type for little-endian streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LittleEndian;

/// Selector type for big-endian streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigEndian;

/// Alias for [`BigEndian`]
pub type BE = BigEndian;

/// Alias for [`LittleEndian`]
pub type LE = LittleEndian;

/// Selector type for the order of the executing machine.
#[cfg(target_endian = "little")]
pub type NE = LittleEndian;

/// Selector type for the order of the executing machine.
#[cfg(target_endian = "big")]
pub type NE = BigEndian;

impl private::Endianness for LittleEndian {
    const SEALED_ORDER: ByteOrder = ByteOrder::LittleEndian;
}
impl private::Endianness for BigEndian {
    const SEALED_ORDER: ByteOrder = ByteOrder::BigEndian;
}
