/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bytestruct::traits::{Swap, swap_width};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_involution_exhaustive() {
    for x in 0..=u8::MAX {
        assert_eq!(x.swap(), x);
        assert_eq!((x as i8).swap(), x as i8);
    }
    for x in 0..=u16::MAX {
        assert_eq!(x.swap().swap(), x);
        assert_eq!(x.swap(), x.swap_bytes());
        let signed = x as i16;
        assert_eq!(signed.swap().swap(), signed);
    }
}

#[test]
fn test_involution_sampled() {
    const N: usize = 1_000_000;
    let mut r = SmallRng::seed_from_u64(0);
    for _ in 0..N {
        let x: u32 = r.random();
        assert_eq!(x.swap().swap(), x);
        assert_eq!(x.swap(), x.swap_bytes());
        assert_eq!((x as i32).swap().swap(), x as i32);

        let y: u64 = r.random();
        assert_eq!(y.swap().swap(), y);
        assert_eq!(y.swap(), y.swap_bytes());
        assert_eq!((y as i64).swap().swap(), y as i64);

        let f = f32::from_bits(x);
        assert_eq!(f.swap().swap().to_bits(), x);
        let g = f64::from_bits(y);
        assert_eq!(g.swap().swap().to_bits(), y);
    }
}

#[test]
fn test_no_promotion() {
    // a promoted negative value would carry its sign bytes into the result
    assert_eq!((-2_i16).swap(), 0xFEFF_u16 as i16);
    assert_eq!((-2_i32).swap(), 0xFEFF_FFFF_u32 as i32);
    assert_eq!(i64::MIN.swap(), 0x80);
}

#[test]
fn test_partial_width() {
    let mut r = SmallRng::seed_from_u64(1);
    for _ in 0..10_000 {
        let x: u64 = r.random();
        let width = r.random_range(2..=8);
        let low = if width == 8 { x } else { x & ((1 << (8 * width)) - 1) };
        let swapped = swap_width(x, width);
        assert_eq!(swap_width(swapped, width), low);
        assert_eq!(swapped, low.swap_bytes() >> (8 * (8 - width)));
    }
}
