/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of word streams, bit streams, and byte-level helpers.

If you need to read or write words from a file or any backend implementing
[`std::io::Read`] or [`std::io::Write`] you just need to wrap it in a
[`WordAdapter`]. If you have an iterator on bytes, or a sink that can be
extended with bytes, use [`BytesToWords`] or [`WordsToBytes`] instead.

If instead you want to read or write directly from memory, you can use
[`MemWordReader`], [`MemWordWriterSlice`], and [`MemWordWriterVec`].

Once you have a way to access words, [`BitPacker`] and [`BitUnpacker`] write
and read bits. By default the packer ends the stream with a finalizer, so
that the unpacker knows exactly where the stream ends;
[`bit_writer_to`] and [`bit_reader_from`] build the two directly on top of
byte streams.

[`FileSlice`] reads a range of a file and [`MemoryMappedFile`] maps one into
memory. [`OverlappingBlocks`] reads a byte stream blockwise keeping the tail
of the previous block around.

*/

mod mem_word_reader;
pub use mem_word_reader::*;

mod mem_word_writer;
pub use mem_word_writer::*;

mod byte_adapter;
pub use byte_adapter::*;

#[cfg(feature = "std")]
mod word_adapter;
#[cfg(feature = "std")]
pub use word_adapter::*;

mod bit_packer;
pub use bit_packer::BitPacker;

mod bit_unpacker;
pub use bit_unpacker::{BitUnpacker, Finalized, StreamEnd, Unbounded};

#[cfg(feature = "std")]
mod bitwise_io;
#[cfg(feature = "std")]
pub use bitwise_io::*;

#[cfg(feature = "std")]
mod file_slice;
#[cfg(feature = "std")]
pub use file_slice::*;

#[cfg(feature = "mmap")]
mod mmap_file;
#[cfg(feature = "mmap")]
pub use mmap_file::*;

#[cfg(feature = "std")]
mod overlapping_blocks;
#[cfg(feature = "std")]
pub use overlapping_blocks::*;
