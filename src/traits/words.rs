/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;
use core::fmt::{Debug, Display, LowerHex};

use num_traits::{PrimInt, Unsigned};

/// The properties that we need from the words moved by a [`WordRead`] or a
/// [`WordWrite`], and packed or unpacked by the bit streams.
///
/// Bit manipulation comes from [`PrimInt`]; the associated constants and
/// conversions fix the widths and the (big-endian) byte order used on the
/// wire, independently of the host.
///
/// Note that the inherent constants of the primitive types shadow the ones
/// of this trait: `u64::BITS` is a `u32`, whereas `<u64 as Word>::BITS` is a
/// `usize`.
pub trait Word:
    PrimInt + Unsigned + Debug + Display + LowerHex + Default + Send + Sync + 'static
{
    /// The number of bits in a word.
    const BITS: usize;
    /// The number of bytes in a word.
    const BYTES: usize;
    const ZERO: Self;
    const ONE: Self;
    /// The word with all bits set.
    const MAX: Self;

    /// The byte representation of a word.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default + Copy + Debug;

    /// Bytes of the word, most significant first.
    fn to_be_bytes(self) -> Self::Bytes;

    /// Word from its bytes, most significant first.
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Truncating conversion to `usize`.
    fn cast_to_usize(self) -> usize;

    /// Truncating conversion from `usize`.
    fn cast_from_usize(value: usize) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty),*) => {$(
        impl Word for $ty {
            const BITS: usize = <$ty>::BITS as usize;
            const BYTES: usize = core::mem::size_of::<$ty>();
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$ty>::MAX;

            type Bytes = [u8; core::mem::size_of::<$ty>()];

            #[inline(always)]
            fn to_be_bytes(self) -> Self::Bytes {
                <$ty>::to_be_bytes(self)
            }

            #[inline(always)]
            fn from_be_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from_be_bytes(bytes)
            }

            #[inline(always)]
            fn cast_to_usize(self) -> usize {
                self as usize
            }

            #[inline(always)]
            fn cast_from_usize(value: usize) -> Self {
                value as $ty
            }
        }
    )*};
}

impl_word!(u8, u16, u32, u64, u128, usize);

/// The default word used by the bit streams: the widest word that is native
/// on common architectures.
pub type PackWord = u64;

/// Return a word whose `n` lowest bits are set.
///
/// `n` must be in `1..=W::BITS`.
#[inline(always)]
#[must_use]
pub fn low_mask<W: Word>(n: usize) -> W {
    debug_assert!(n > 0 && n <= W::BITS);
    !((W::MAX << (n - 1)) << 1)
}

/// Sequential, streaming word-by-word reads.
pub trait WordRead {
    type Error: Error + Send + Sync + 'static;

    /// The word type (the type of the result of [`WordRead::read_word`]).
    type Word: Word;

    /// Read a word and advance the current position.
    fn read_word(&mut self) -> Result<Self::Word, Self::Error>;
}

/// Word streams that can tell in advance whether another word is available.
///
/// This is what makes a finalized [`BitUnpacker`](crate::impls::BitUnpacker)
/// possible: the last word of a stream carries the finalizer, and it can be
/// recognized only if we know that no word follows.
pub trait WordEof: WordRead {
    /// Return true if the next call to [`WordRead::read_word`] would hit the
    /// end of the stream.
    fn at_eof(&mut self) -> Result<bool, Self::Error>;
}

/// Sequential, streaming word-by-word writes.
pub trait WordWrite {
    type Error: Error + Send + Sync + 'static;

    /// The word type (the type of the argument of [`WordWrite::write_word`]).
    type Word: Word;

    /// Write a word and advance the current position.
    fn write_word(&mut self, word: Self::Word) -> Result<(), Self::Error>;

    /// Flush the stream.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Seekability for [`WordRead`] and [`WordWrite`] streams.
pub trait WordSeek {
    type Error: Error + Send + Sync + 'static;
    /// Get the current position in words from the start of the stream.
    fn word_pos(&mut self) -> Result<u64, Self::Error>;

    /// Set the current position in words from the start of the stream to `word_pos`.
    fn set_word_pos(&mut self, word_pos: u64) -> Result<(), Self::Error>;
}

/// Errors of the in-memory word streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    /// A read or write went past the end of the underlying memory.
    UnexpectedEof { word_pos: usize },
    /// A seek targeted a position beyond the end of the underlying memory.
    OutOfBounds { word_pos: usize, len: usize },
}

impl core::error::Error for WordError {}
impl core::fmt::Display for WordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WordError::UnexpectedEof { word_pos } => {
                write!(f, "Unexpected end of data at word position {}", word_pos)
            }
            WordError::OutOfBounds { word_pos, len } => {
                write!(f, "Position beyond end of data: {} > {}", word_pos, len)
            }
        }
    }
}
