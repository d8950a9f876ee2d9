/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits

The bottom layer is made of [`ByteSource`] and [`ByteSink`], the minimal
capabilities of a concrete collaborator (a file, a socket, a slice). On top of
them, [`ScalarRead`] and [`ScalarWrite`] provide endianness-aware scalar
access, with the byte order selected at runtime through [`ByteOrdered`] or
statically through an [`Endianness`] marker.

*/

mod error;
pub use error::*;

mod byte_order;
pub use byte_order::*;

mod swap;
pub use swap::*;

mod scalar;
pub use scalar::*;

mod byte_stream;
pub use byte_stream::*;

mod scalar_stream;
pub use scalar_stream::*;
