/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};
use std::io::{BufRead, Read, Seek, SeekFrom, Write};

/// An adapter from [`Read`], [`BufRead`], [`Write`], and [`Seek`], to
/// [`WordRead`], [`WordEof`], [`WordWrite`], and [`WordSeek`], respectively.
///
/// Instances of this struct can be created using [`WordAdapter::new`]. They
/// turn every standard (possibly seekable) source or destination of bytes (such
/// as [`std::fs::File`], [`std::io::BufReader`], sockets, etc.) into a source
/// or destination of words.
///
/// Words are stored most significant byte first, whatever the byte order of
/// the host, so streams written on one machine can be read on any other.
///
/// Detecting the end of the stream in advance, as required by a finalized
/// [`BitUnpacker`](crate::impls::BitUnpacker), is possible only when the
/// backend is a [`BufRead`].
///
/// The length of the underlying byte stream should be a multiple of
/// `W::BYTES`: a partial word at the end is reported as an
/// [`UnexpectedEof`](std::io::ErrorKind::UnexpectedEof) error.
///
/// [`word_pos`](WordAdapter::word_pos) returns the position of the
/// underlying [`Seek`] rounded up to the next multiple of `W::BYTES`; if you
/// adapt a [`Seek`], its current position should be a multiple of
/// `W::BYTES`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct WordAdapter<W: Word, B> {
    backend: B,
    _marker: core::marker::PhantomData<W>,
}

impl<W: Word, B> WordAdapter<W, B> {
    /// Create a new WordAdapter
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            _marker: core::marker::PhantomData,
        }
    }

    pub fn into_inner(self) -> B {
        self.backend
    }
}

impl<W: Word, B: Read> WordRead for WordAdapter<W, B> {
    type Error = std::io::Error;
    type Word = W;

    #[inline(always)]
    fn read_word(&mut self) -> Result<W, Self::Error> {
        let mut res: W::Bytes = Default::default();
        self.backend
            .read_exact(res.as_mut())
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => std::io::Error::new(
                    e.kind(),
                    format!(
                        concat!(
                            "Unexpected end of file. ",
                            "This might happen because the file length is not a multiple of the word size used for reading ({} bytes). ",
                            "The inner std::io::Error was {:?}"
                        ),
                        W::BYTES,
                        e
                    ),
                ),
                _ => e,
            })?;
        Ok(W::from_be_bytes(res))
    }
}

impl<W: Word, B: BufRead> WordEof for WordAdapter<W, B> {
    #[inline(always)]
    fn at_eof(&mut self) -> Result<bool, std::io::Error> {
        Ok(self.backend.fill_buf()?.is_empty())
    }
}

impl<W: Word, B: Write> WordWrite for WordAdapter<W, B> {
    type Error = std::io::Error;
    type Word = W;

    #[inline(always)]
    fn write_word(&mut self, word: W) -> Result<(), std::io::Error> {
        self.backend.write_all(word.to_be_bytes().as_ref())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.backend.flush()
    }
}

impl<W: Word, B: Seek> WordSeek for WordAdapter<W, B> {
    type Error = std::io::Error;

    #[inline(always)]
    fn word_pos(&mut self) -> Result<u64, std::io::Error> {
        Ok(self.backend.stream_position()?.div_ceil(W::BYTES as u64))
    }

    #[inline(always)]
    fn set_word_pos(&mut self, word_index: u64) -> Result<(), std::io::Error> {
        self.backend
            .seek(SeekFrom::Start(word_index * W::BYTES as u64))?;
        Ok(())
    }
}
