/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::Swap;
use num_traits::{PrimInt, ToBytes};

/// A UTF-16 code unit.
pub type Char16 = u16;

/// An unsigned 8-bit quantity, presented in a wider type.
pub type Nat8 = u16;

/// An unsigned 16-bit quantity, presented in a wider type.
pub type Nat16 = u32;

/// The raw representation of a [`Scalar`] on the wire: an unsigned integer
/// of the same width.
pub trait RawBits: PrimInt + From<u8> + ToBytes + Swap {}
impl<W: PrimInt + From<u8> + ToBytes + Swap> RawBits for W {}

/// Fixed-width numeric values that can be read from and written to a byte
/// stream.
///
/// Every scalar is transmitted as the big-endian bytes of its
/// [raw bits](Scalar::to_bits), swapped beforehand if the byte order in use
/// is not canonical.
pub trait Scalar: Copy + Swap {
    /// Unsigned integer of the same width holding the raw representation.
    type Bits: RawBits;
    /// Width in bytes.
    const BYTES: usize;
    /// Name used in error messages and logs.
    const NAME: &'static str;

    fn to_bits(self) -> Self::Bits;

    fn from_bits(bits: Self::Bits) -> Self;
}

macro_rules! impl_scalar_int {
    ($($ty:ty => $bits:ty),*) => {$(
        impl Scalar for $ty {
            type Bits = $bits;
            const BYTES: usize = core::mem::size_of::<$ty>();
            const NAME: &'static str = stringify!($ty);

            #[inline(always)]
            fn to_bits(self) -> $bits {
                self as $bits
            }

            #[inline(always)]
            fn from_bits(bits: $bits) -> Self {
                bits as $ty
            }
        }
    )*};
}

impl_scalar_int!(i8 => u8, u8 => u8, i16 => u16, u16 => u16, i32 => u32, u32 => u32, i64 => u64, u64 => u64);

impl Scalar for f32 {
    type Bits = u32;
    const BYTES: usize = 4;
    const NAME: &'static str = "f32";

    #[inline(always)]
    fn to_bits(self) -> u32 {
        f32::to_bits(self)
    }

    #[inline(always)]
    fn from_bits(bits: u32) -> Self {
        f32::from_bits(bits)
    }
}

impl Scalar for f64 {
    type Bits = u64;
    const BYTES: usize = 8;
    const NAME: &'static str = "f64";

    #[inline(always)]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}
