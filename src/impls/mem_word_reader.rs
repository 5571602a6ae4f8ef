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

/// An implementation of [`WordRead`], [`WordEof`], and [`WordSeek`] for a
/// slice.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let words: [u64; 2] = [
///     0x0043b59fcdf16077,
///     0x702863e6f9739b86,
/// ];
///
/// let mut word_reader = MemWordReader::new(&words);
///
/// // the stream is read sequentially
/// assert_eq!(word_reader.word_pos()?, 0);
/// assert_eq!(word_reader.read_word()?, 0x0043b59fcdf16077);
/// assert_eq!(word_reader.word_pos()?, 1);
/// assert_eq!(word_reader.read_word()?, 0x702863e6f9739b86);
/// assert_eq!(word_reader.word_pos()?, 2);
/// assert!(word_reader.at_eof()?);
/// assert!(word_reader.read_word().is_err());
///
/// // you can change position
/// assert!(word_reader.set_word_pos(1).is_ok());
/// assert_eq!(word_reader.word_pos()?, 1);
/// assert_eq!(word_reader.read_word()?, 0x702863e6f9739b86);
///
/// // errored set position doesn't change the current position
/// assert_eq!(word_reader.word_pos()?, 2);
/// assert!(word_reader.set_word_pos(100).is_err());
/// assert_eq!(word_reader.word_pos()?, 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct MemWordReader<W: Word, B: AsRef<[W]>> {
    data: B,
    word_index: usize,
    _marker: core::marker::PhantomData<W>,
}

impl<W: Word, B: AsRef<[W]>> MemWordReader<W, B> {
    /// Create a new [`MemWordReader`] from a slice of data
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            word_index: 0,
            _marker: Default::default(),
        }
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<W: Word, B: AsRef<[W]>> WordRead for MemWordReader<W, B> {
    type Error = WordError;
    type Word = W;

    #[inline(always)]
    fn read_word(&mut self) -> Result<W, WordError> {
        let res = self
            .data
            .as_ref()
            .get(self.word_index)
            .ok_or(WordError::UnexpectedEof {
                word_pos: self.word_index,
            })?;
        self.word_index += 1;
        Ok(*res)
    }
}

impl<W: Word, B: AsRef<[W]>> WordEof for MemWordReader<W, B> {
    #[inline(always)]
    fn at_eof(&mut self) -> Result<bool, WordError> {
        Ok(self.word_index >= self.data.as_ref().len())
    }
}

impl<W: Word, B: AsRef<[W]>> WordSeek for MemWordReader<W, B> {
    type Error = WordError;

    #[inline(always)]
    fn word_pos(&mut self) -> Result<u64, WordError> {
        Ok(self.word_index as u64)
    }

    #[inline(always)]
    fn set_word_pos(&mut self, word_index: u64) -> Result<(), WordError> {
        let len = self.data.as_ref().len();
        if word_index > len as u64 {
            return Err(WordError::OutOfBounds {
                word_pos: word_index as usize,
                len,
            });
        }
        self.word_index = word_index as usize;
        Ok(())
    }
}
