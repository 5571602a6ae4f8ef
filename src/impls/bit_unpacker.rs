/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::marker::PhantomData;

use crate::traits::*;
use crate::utils::{decode_finalizer, payload_bits};

mod private {
    pub trait Sealed {}
}

/// Selects how a [`BitUnpacker`] finds the end of its stream.
///
/// This trait is sealed: its only implementations are [`Finalized`] and
/// [`Unbounded`].
pub trait StreamEnd<WR: WordRead>: private::Sealed {
    /// Whether the unpacker keeps a word of lookahead.
    const LOOKAHEAD: bool;
    /// Return true if the backend has no more words.
    fn at_end(backend: &mut WR) -> Result<bool, WR::Error>;
}

/// The stream ends with a finalizer written by a
/// [`BitPacker`](crate::impls::BitPacker).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Finalized;

/// The stream has no finalizer: words are read as long as the caller asks
/// for bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unbounded;

impl private::Sealed for Finalized {}
impl private::Sealed for Unbounded {}

impl<WR: WordEof> StreamEnd<WR> for Finalized {
    const LOOKAHEAD: bool = true;

    #[inline(always)]
    fn at_end(backend: &mut WR) -> Result<bool, WR::Error> {
        backend.at_eof()
    }
}

impl<WR: WordRead> StreamEnd<WR> for Unbounded {
    const LOOKAHEAD: bool = false;

    #[inline(always)]
    fn at_end(_backend: &mut WR) -> Result<bool, WR::Error> {
        Ok(false)
    }
}

/// An implementation of [`BitRead`] unpacking the bits stored in the words of
/// a [`WordRead`] by a [`BitPacker`](crate::impls::BitPacker).
///
/// In the default [`Finalized`] mode, built by [`BitUnpacker::new`], the
/// unpacker reads the stream one word ahead: the last word carries the
/// finalizer, and it can be recognized only once we know that no other word
/// follows. The backend must thus implement [`WordEof`], and
/// [`eof`](BitRead::eof) becomes true exactly after the last bit written by
/// the packer has been read.
///
/// In the [`Unbounded`] mode, built by [`BitUnpacker::new_unbounded`], words
/// are read on demand and [`eof`](BitRead::eof) is always false. Reading past
/// the last word returns the error of the backend.
///
/// Reading past the end of a finalized stream is a programming error. It is
/// caught by a debug assertion, or by an assertion when a new word would be
/// needed.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let words: [u64; 1] = [0b101110 | 5 << 57];
/// let mut unpacker = BitUnpacker::new(MemWordReader::new(&words))?;
/// assert!(!unpacker.read_bit()?);
/// assert!(unpacker.read_bit()?);
/// assert_eq!(unpacker.read_bits(4)?, 0b1011);
/// assert!(unpacker.eof());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct BitUnpacker<WR: WordRead, M = Finalized> {
    /// The [`WordRead`] providing the words.
    backend: WR,
    /// The word being read.
    pack: WR::Word,
    /// The lookahead word, unused in [`Unbounded`] mode.
    next: WR::Word,
    /// The position of the next bit of `pack` to read. It is equal to the word
    /// size when a new word is needed.
    pos: usize,
    /// Whether `pack` is the last word of the stream.
    last: bool,
    /// The number of valid bits in `pack` if `last` is true.
    avail: usize,
    _marker: PhantomData<M>,
}

impl<WR: WordEof> BitUnpacker<WR, Finalized> {
    /// Create a new [`BitUnpacker`] reading a finalized stream.
    ///
    /// The first word (if any) is read immediately.
    pub fn new(backend: WR) -> Result<Self, WR::Error> {
        let mut this = Self::with_backend(backend);
        if this.backend.at_eof()? {
            this.last = true;
        } else {
            this.next = this.backend.read_word()?;
        }
        Ok(this)
    }
}

impl<WR: WordRead> BitUnpacker<WR, Unbounded> {
    /// Create a new [`BitUnpacker`] reading a stream without finalizer, as
    /// written by [`BitPacker::without_finalizer`](crate::impls::BitPacker::without_finalizer).
    #[must_use]
    pub fn new_unbounded(backend: WR) -> Self {
        Self::with_backend(backend)
    }
}

impl<WR: WordRead, M> BitUnpacker<WR, M> {
    fn with_backend(backend: WR) -> Self {
        Self {
            backend,
            pack: WR::Word::ZERO,
            next: WR::Word::ZERO,
            pos: WR::Word::BITS,
            last: false,
            avail: 0,
            _marker: PhantomData,
        }
    }

    /// Return the backend.
    ///
    /// In [`Finalized`] mode the backend might have been read one word
    /// beyond the current one.
    pub fn into_inner(self) -> WR {
        self.backend
    }
}

impl<WR: WordRead, M: StreamEnd<WR>> BitUnpacker<WR, M> {
    /// Move to the next word, reading a new lookahead word and checking
    /// whether the stream is ending.
    #[inline]
    fn advance(&mut self) -> Result<(), WR::Error> {
        if !M::LOOKAHEAD {
            self.pack = self.backend.read_word()?;
            self.pos = 0;
            return Ok(());
        }

        assert!(!self.last, "Read past the end of a finalized bit stream");
        self.pack = self.next;
        self.pos = 0;

        if M::at_end(&mut self.backend)? {
            self.last = true;
            self.avail = decode_finalizer(self.pack);
        } else {
            self.next = self.backend.read_word()?;
            if M::at_end(&mut self.backend)? {
                // a count that does not fit beside a payload means that the
                // lookahead is a finalizer-only word about the current one
                let valid_bits = decode_finalizer(self.next);
                if valid_bits >= payload_bits::<WR::Word>() {
                    self.last = true;
                    self.avail = valid_bits;
                }
            }
        }
        Ok(())
    }
}

impl<WR: WordRead, M: StreamEnd<WR>> BitRead for BitUnpacker<WR, M> {
    type Error = WR::Error;
    type Word = WR::Word;

    #[inline]
    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        debug_assert!(!self.eof(), "Read past the end of a finalized bit stream");
        if self.pos >= WR::Word::BITS {
            self.advance()?;
        }
        let bit = (self.pack >> self.pos) & WR::Word::ONE;
        self.pos += 1;
        Ok(bit != WR::Word::ZERO)
    }

    #[inline]
    fn read_bits(&mut self, n: usize) -> Result<Self::Word, Self::Error> {
        assert!(
            n > 0 && n <= WR::Word::BITS,
            "The number of bits to read has to be in [1, {}] and {} is not",
            WR::Word::BITS,
            n
        );
        debug_assert!(!self.eof(), "Read past the end of a finalized bit stream");

        let left = WR::Word::BITS - self.pos;
        if n <= left {
            let res = (self.pack >> self.pos) & low_mask::<WR::Word>(n);
            self.pos += n;
            return Ok(res);
        }

        let low = if left > 0 {
            self.pack >> self.pos
        } else {
            WR::Word::ZERO
        };
        self.advance()?;
        let high_bits = n - left;
        let high = self.pack & low_mask::<WR::Word>(high_bits);
        self.pos = high_bits;
        // left < n <= BITS, so the shift is in range
        Ok(low | (high << left))
    }

    #[inline(always)]
    fn pack_pos(&self) -> usize {
        self.pos % WR::Word::BITS
    }

    #[inline(always)]
    fn eof(&self) -> bool {
        self.last && self.pos >= self.avail
    }
}
