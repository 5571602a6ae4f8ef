/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::{BufRead, Write};

use crate::impls::{BitPacker, BitUnpacker, WordAdapter};
use crate::traits::PackWord;

/// Create a [`BitUnpacker`] reading a finalized bit stream of
/// [`PackWord`]s from a [`BufRead`].
///
/// The first word is read immediately.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let mut bytes: Vec<u8> = vec![];
/// let mut writer = bit_writer_to(&mut bytes);
/// writer.write_bits(42, 7)?;
/// writer.close()?;
/// drop(writer);
///
/// let mut reader = bit_reader_from(&bytes[..])?;
/// assert_eq!(reader.read_bits(7)?, 42);
/// assert!(reader.eof());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// The standard input works as well, once locked:
/// ```no_run
/// use bitpack_stream::prelude::*;
///
/// let mut reader = bit_reader_from(std::io::stdin().lock())?;
/// let mut ones = 0;
/// while !reader.eof() {
///     ones += reader.read_bit()? as usize;
/// }
/// println!("{} ones", ones);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn bit_reader_from<B: BufRead>(
    backend: B,
) -> std::io::Result<BitUnpacker<WordAdapter<PackWord, B>>> {
    BitUnpacker::new(WordAdapter::new(backend))
}

/// Create a [`BitPacker`] writing a finalized bit stream of [`PackWord`]s
/// to a [`Write`].
///
/// Note that each word is passed to the backend with a separate write, so
/// an unbuffered backend should be wrapped in a
/// [`BufWriter`](std::io::BufWriter).
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
/// use std::io::BufWriter;
///
/// let path = std::env::temp_dir().join("bitpack_stream_doc_bit_writer_to");
/// let mut writer = bit_writer_to(BufWriter::new(std::fs::File::create(&path)?));
/// writer.write_bits(0b101, 3)?;
/// // closing flushes the BufWriter
/// writer.close()?;
/// drop(writer);
///
/// let mut reader = bit_reader_from(FileSlice::open(&path)?)?;
/// assert_eq!(reader.read_bits(3)?, 0b101);
/// assert!(reader.eof());
///
/// std::fs::remove_file(&path)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn bit_writer_to<B: Write>(backend: B) -> BitPacker<WordAdapter<PackWord, B>> {
    BitPacker::new(WordAdapter::new(backend))
}
