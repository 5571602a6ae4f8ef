/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Adapters between sequences of bytes and sequences of words.

Both adapters use the byte order of [`WordAdapter`](crate::impls::WordAdapter),
most significant byte first, but they work on iterators and [`Extend`] sinks,
so they are available without `std`.

*/

use core::convert::Infallible;
use core::marker::PhantomData;

use crate::traits::*;

/// Turn an iterator on bytes into an iterator on words, and into a
/// [`WordRead`] that can detect the end of the stream.
///
/// Each word is assembled from [`W::BYTES`](Word::BYTES) bytes, most
/// significant first. If the bytes end in the middle of a word, the partial
/// word is dropped.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let mut words = BytesToWords::<u32, _>::new([1, 2, 3, 4, 5, 6].into_iter());
/// assert!(!words.at_eof()?);
/// assert_eq!(words.read_word()?, 0x01020304);
/// // the last two bytes do not make a word
/// assert!(words.at_eof()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct BytesToWords<W: Word, I: Iterator<Item = u8>> {
    bytes: I,
    /// The next word, if the bytes contain one.
    next: Option<W>,
    /// The number of words returned so far.
    word_pos: usize,
}

impl<W: Word, I: Iterator<Item = u8>> BytesToWords<W, I> {
    /// Create a new [`BytesToWords`]; the bytes for the first word are read
    /// immediately.
    pub fn new(bytes: I) -> Self {
        let mut this = Self {
            bytes,
            next: None,
            word_pos: 0,
        };
        this.next = this.pack();
        this
    }

    fn pack(&mut self) -> Option<W> {
        let mut buffer = W::Bytes::default();
        for byte in buffer.as_mut() {
            *byte = self.bytes.next()?;
        }
        Some(W::from_be_bytes(buffer))
    }

    /// Return the byte iterator, which may have been advanced one word beyond
    /// the last word returned.
    pub fn into_inner(self) -> I {
        self.bytes
    }
}

impl<W: Word, I: Iterator<Item = u8>> Iterator for BytesToWords<W, I> {
    type Item = W;

    #[inline]
    fn next(&mut self) -> Option<W> {
        let word = self.next?;
        self.next = self.pack();
        self.word_pos += 1;
        Some(word)
    }
}

impl<W: Word, I: Iterator<Item = u8>> core::iter::FusedIterator for BytesToWords<W, I> {}

impl<W: Word, I: Iterator<Item = u8>> WordRead for BytesToWords<W, I> {
    type Error = WordError;
    type Word = W;

    #[inline]
    fn read_word(&mut self) -> Result<W, WordError> {
        let word_pos = self.word_pos;
        self.next()
            .ok_or(WordError::UnexpectedEof { word_pos })
    }
}

impl<W: Word, I: Iterator<Item = u8>> WordEof for BytesToWords<W, I> {
    #[inline]
    fn at_eof(&mut self) -> Result<bool, WordError> {
        Ok(self.next.is_none())
    }
}

/// Turn a sink of bytes into a [`WordWrite`].
///
/// Each word is split into [`W::BYTES`](Word::BYTES) bytes, most significant
/// first, which are passed to the sink using [`Extend`]. Since extending
/// cannot fail, neither can writing.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let mut words = WordsToBytes::<u16, Vec<u8>>::new(vec![]);
/// words.write_word(0xcafe)?;
/// words.write_word(0x0001)?;
/// assert_eq!(words.into_inner(), [0xca, 0xfe, 0x00, 0x01]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct WordsToBytes<W: Word, S: Extend<u8>> {
    sink: S,
    _marker: PhantomData<W>,
}

impl<W: Word, S: Extend<u8>> WordsToBytes<W, S> {
    /// Create a new [`WordsToBytes`] extending `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            _marker: PhantomData,
        }
    }

    /// Return the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<W: Word, S: Extend<u8>> WordWrite for WordsToBytes<W, S> {
    type Error = Infallible;
    type Word = W;

    #[inline]
    fn write_word(&mut self, word: W) -> Result<(), Infallible> {
        self.sink.extend(word.to_be_bytes().as_ref().iter().copied());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}
