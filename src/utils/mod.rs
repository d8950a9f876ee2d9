/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Debug helpers and text encodings.

[`DbgReader`] and [`DbgWriter`] log at the debug level all scalars read from
a [`ScalarRead`](crate::traits::ScalarRead) or written to a
[`ScalarWrite`](crate::traits::ScalarWrite), respectively.

The [`mutf8`] module contains the modified UTF-8 encoding used by
length-prefixed strings.

*/

mod dbg;
pub use dbg::*;

pub mod mutf8;
