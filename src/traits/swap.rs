/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Byte-order reversal of fixed-width numeric values.

All swaps go through [`swap_width`], which pops the lowest byte off the input
and pushes it onto an accumulator, exactly once per byte of the declared width.
Signed integers are swapped through the unsigned integer of the same width,
and reals through their raw bits, so no value is ever promoted to a wider type
(promoting a negative 16-bit value to 32 bits would place the meaningful bytes
in a sign-dependent half).

*/

use num_traits::PrimInt;

/// Reverse the lowest `byte_width` bytes of `value`.
///
/// Bytes above `byte_width` are discarded, so the result has at most
/// `byte_width` significant bytes. For a `byte_width` of one or zero, `value`
/// is returned unchanged.
#[inline(always)]
#[must_use]
pub fn swap_width<W: PrimInt + From<u8>>(value: W, byte_width: usize) -> W {
    if byte_width <= 1 {
        return value;
    }
    let mask = <W as From<u8>>::from(0xFF);
    let mut rest = value;
    let mut swapped = rest & mask;
    for _ in 1..byte_width {
        rest = rest >> 8;
        swapped = (swapped << 8) | (rest & mask);
    }
    swapped
}

/// Values whose byte sequence can be reversed.
///
/// For every value `x`, `x.swap().swap() == x` (bitwise, for reals).
pub trait Swap: Sized {
    /// Return `self` with its bytes in reverse order.
    #[must_use]
    fn swap(self) -> Self;
}

macro_rules! impl_swap_unsigned {
    ($($ty:ty),*) => {$(
        impl Swap for $ty {
            #[inline(always)]
            fn swap(self) -> Self {
                swap_width(self, core::mem::size_of::<$ty>())
            }
        }
    )*};
}

impl_swap_unsigned!(u8, u16, u32, u64);

macro_rules! impl_swap_signed {
    ($($ty:ty => $uty:ty),*) => {$(
        impl Swap for $ty {
            #[inline(always)]
            fn swap(self) -> Self {
                (self as $uty).swap() as $ty
            }
        }
    )*};
}

impl_swap_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);

impl Swap for f32 {
    #[inline(always)]
    fn swap(self) -> Self {
        f32::from_bits(self.to_bits().swap())
    }
}

impl Swap for f64 {
    #[inline(always)]
    fn swap(self) -> Self {
        f64::from_bits(self.to_bits().swap())
    }
}
