/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
#[cfg(feature = "alloc")]
use core::convert::Infallible;

/// An implementation of [`WordWrite`] and [`WordSeek`] for a mutable slice.
///
/// Writing past the end of the slice returns an error.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let mut words: [u64; 2] = [0; 2];
///
/// let mut word_writer = MemWordWriterSlice::new(&mut words);
///
/// assert!(word_writer.write_word(0x0043b59fcdf16077).is_ok());
/// assert!(word_writer.write_word(0x702863e6f9739b86).is_ok());
/// assert_eq!(word_writer.word_pos()?, 2);
/// // the slice is full
/// assert!(word_writer.write_word(0).is_err());
///
/// // you can change position
/// assert!(word_writer.set_word_pos(0).is_ok());
/// assert!(word_writer.write_word(0x0b801b2bf696e8d2).is_ok());
///
/// assert_eq!(words, [0x0b801b2bf696e8d2, 0x702863e6f9739b86]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, PartialEq)]
pub struct MemWordWriterSlice<W: Word, B: AsMut<[W]>> {
    data: B,
    word_index: usize,
    _marker: core::marker::PhantomData<W>,
}

impl<W: Word, B: AsMut<[W]>> MemWordWriterSlice<W, B> {
    /// Create a new [`MemWordWriterSlice`] from a slice.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            word_index: 0,
            _marker: Default::default(),
        }
    }

    pub fn len(&mut self) -> usize {
        self.data.as_mut().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<W: Word, B: AsMut<[W]>> WordWrite for MemWordWriterSlice<W, B> {
    type Error = WordError;
    type Word = W;

    #[inline]
    fn write_word(&mut self, word: W) -> Result<(), WordError> {
        match self.data.as_mut().get_mut(self.word_index) {
            Some(word_ref) => {
                self.word_index += 1;
                *word_ref = word;
                Ok(())
            }
            None => Err(WordError::UnexpectedEof {
                word_pos: self.word_index,
            }),
        }
    }

    fn flush(&mut self) -> Result<(), WordError> {
        Ok(())
    }
}

impl<W: Word, B: AsMut<[W]>> WordSeek for MemWordWriterSlice<W, B> {
    type Error = WordError;

    #[inline]
    fn word_pos(&mut self) -> Result<u64, WordError> {
        Ok(self.word_index as u64)
    }

    #[inline]
    fn set_word_pos(&mut self, word_index: u64) -> Result<(), WordError> {
        let len = self.data.as_mut().len();
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

/// An implementation of [`WordWrite`] for a [`Vec`](alloc::vec::Vec). The
/// core difference with [`MemWordWriterSlice`] is that the vector grows as
/// needed, so writes never fail.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let mut words: Vec<u64> = vec![];
///
/// let mut word_writer = MemWordWriterVec::new(&mut words);
///
/// assert!(word_writer.write_word(0).is_ok());
/// assert!(word_writer.write_word(1).is_ok());
/// assert_eq!(word_writer.len(), 2);
/// assert_eq!(words, vec![0, 1]);
/// ```
#[derive(Debug, PartialEq)]
#[cfg(feature = "alloc")]
pub struct MemWordWriterVec<W: Word, B: AsMut<alloc::vec::Vec<W>>> {
    data: B,
    _marker: core::marker::PhantomData<W>,
}

#[cfg(feature = "alloc")]
impl<W: Word, B: AsMut<alloc::vec::Vec<W>>> MemWordWriterVec<W, B> {
    /// Create a new [`MemWordWriterVec`] appending to the given vector.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self {
            data,
            _marker: Default::default(),
        }
    }

    pub fn len(&mut self) -> usize {
        self.data.as_mut().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

#[cfg(feature = "alloc")]
impl<W: Word, B: AsMut<alloc::vec::Vec<W>>> WordWrite for MemWordWriterVec<W, B> {
    type Error = Infallible;
    type Word = W;

    #[inline]
    fn write_word(&mut self, word: W) -> Result<(), Infallible> {
        self.data.as_mut().push(word);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
