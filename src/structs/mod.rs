/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Descriptions of binary layouts, composed from a closed set of structs.
//!
//! A [`Struct`] describes how one binary value is laid out, and knows how to
//! [read](Struct::read) it from a [`ScalarRead`](crate::traits::ScalarRead)
//! and [write](Struct::write) it to a
//! [`ScalarWrite`](crate::traits::ScalarWrite). Structs are built from five
//! kinds of components:
//!
//! - [atoms](Atom), which read and write a single scalar (or a
//!   length-prefixed string) using the current byte order of the stream;
//! - [sequences](Struct::Sequence), which read and write their children in
//!   order, collecting the values in a [`Composite`];
//! - [repeated structs](Struct::Repeated), which read a number of elements
//!   given by a [`Count`];
//! - [conditional structs](Conditional), which are present only if a
//!   predicate holds;
//! - [byte-order overrides](Struct::OrderOverride), which switch the stream
//!   to a fixed byte order before delegating to their inner struct.
//!
//! Values are [dynamically typed](Value), and slots of a composite are typed
//! at access time.
//!
//! # Byte order
//!
//! The byte order of a stream is ambient state: the built-in overrides
//! [`Struct::little_endian`] and [`Struct::big_endian`] do not restore the
//! previous order, so in a sequence every sibling following an override sees
//! the order it set. Use [`Struct::scoped_order`] to restore the order
//! instead:
//!```rust
//! use bytestruct::prelude::*;
//!
//! let leaky = Struct::sequence([Struct::little_endian(int16()), int16()]);
//! let scoped = Struct::sequence([Struct::scoped_order(ByteOrder::LittleEndian, int16()), int16()]);
//!
//! let data = [0x01_u8, 0x00, 0x01, 0x00];
//! assert_eq!(leaky.read(&mut ByteReader::from_bytes(&data)).unwrap().to_string(), "Composite(1|1)");
//! assert_eq!(scoped.read(&mut ByteReader::from_bytes(&data)).unwrap().to_string(), "Composite(1|256)");
//!```
//!
//! # Counts
//!
//! A repeated struct never writes its count: as in most binary formats, the
//! count is a field of its own, preceding the elements. The usual way to
//! express this is a [`Count::Slot`] referring to an earlier slot of the same
//! sequence, which is what [`Struct::counted_array`] builds. On write, fixed
//! and slot counts are checked against the number of elements.

mod value;
pub use value::*;

mod atom;
pub use atom::*;

mod count;
pub use count::*;

mod conditional;
pub use conditional::*;

mod layout;
pub use layout::*;
