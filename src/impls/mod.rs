/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of byte sources, byte sinks and scalar streams.

If you need to read or write bytes from a file or any backend implementing
[`std::io::Read`] or [`std::io::Write`] you just need to wrap it in a
[`ByteAdapter`]; if the backend also implements [`std::io::Seek`], a
[`SeekAdapter`] will give you checkpoints, too.

If instead you want to read or write directly from memory, you can use
[`MemByteReader`] and [`MemByteWriter`].

Once you have a source or a sink, wrap it in a [`ByteReader`] or a
[`ByteWriter`] to access scalars with a byte order selectable at runtime.

*/

mod mem_byte_reader;
pub use mem_byte_reader::*;

mod mem_byte_writer;
pub use mem_byte_writer::*;

mod byte_adapter;
pub use byte_adapter::*;

mod byte_reader;
pub use byte_reader::ByteReader;

mod byte_writer;
pub use byte_writer::ByteWriter;
