/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;
use core::fmt::{Display, Formatter};

use super::Word;

/// The error returned by the bit copy methods [`BitRead::copy_to`] and [`BitWrite::copy_from`].
///
/// It can be a read or a write error, depending on which stream (source or
/// destination) generated the error.
#[derive(Debug, Clone)]
pub enum CopyError<RE: Error + Send + Sync + 'static, WE: Error + Send + Sync + 'static> {
    ReadError(RE),
    WriteError(WE),
}

impl<RE: Error + Send + Sync + 'static, WE: Error + Send + Sync + 'static> Display
    for CopyError<RE, WE>
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CopyError::ReadError(e) => write!(f, "Read error while copying: {}", e),
            CopyError::WriteError(e) => write!(f, "Write error while copying: {}", e),
        }
    }
}

impl<RE: Error + Send + Sync + 'static, WE: Error + Send + Sync + 'static> Error
    for CopyError<RE, WE>
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CopyError::ReadError(e) => Some(e),
            CopyError::WriteError(e) => Some(e),
        }
    }
}

/// Sequential, streaming bit-by-bit reads.
///
/// Bits are read in the order in which a [`BitWrite`] on the same word type
/// wrote them: within a word, from the least significant bit upwards.
pub trait BitRead {
    type Error: Error + Send + Sync + 'static;

    /// The word type the bits are unpacked from, which is also the type of
    /// the result of [`BitRead::read_bits`].
    type Word: Word;

    /// Read a single bit.
    fn read_bit(&mut self) -> Result<bool, Self::Error>;

    /// Read `n` bits and return them in the lowest bits.
    ///
    /// Implementors must panic if `n` is zero or greater than
    /// `Self::Word::BITS`.
    fn read_bits(&mut self, n: usize) -> Result<Self::Word, Self::Error>;

    /// Return the position of the next bit to be read in the current word.
    fn pack_pos(&self) -> usize;

    /// Return true if all the bits of the stream have been read.
    fn eof(&self) -> bool;

    /// Return true if there is at least one more bit to read.
    fn good(&self) -> bool {
        !self.eof()
    }

    /// Copy `n` bits from this stream to `bit_write`.
    fn copy_to<W: BitWrite<Word = Self::Word>>(
        &mut self,
        bit_write: &mut W,
        mut n: u64,
    ) -> Result<(), CopyError<Self::Error, W::Error>> {
        while n > 0 {
            let to_read = core::cmp::min(n, Self::Word::BITS as u64) as usize;
            let read = self.read_bits(to_read).map_err(CopyError::ReadError)?;
            bit_write
                .write_bits(read, to_read)
                .map_err(CopyError::WriteError)?;
            n -= to_read as u64;
        }
        Ok(())
    }
}

/// Sequential, streaming bit-by-bit writes.
pub trait BitWrite {
    type Error: Error + Send + Sync + 'static;

    /// The word type the bits are packed into, which is also the type of
    /// the argument of [`BitWrite::write_bits`].
    type Word: Word;

    /// Write a single bit.
    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error>;

    /// Write the lowest `n` bits of `value` to the stream and return the number
    /// of bits written, that is, `n`.
    ///
    /// Implementors must panic if `n` is zero or greater than
    /// `Self::Word::BITS`. Moreover, if the feature `checks` is enabled they
    /// should check that the remaining bits of `value` are zero.
    fn write_bits(&mut self, value: Self::Word, n: usize) -> Result<usize, Self::Error>;

    /// Write out the current partial word, padding it with zeros.
    ///
    /// Does nothing if the current word is empty.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Return the number of bits written so far, excluding padding and
    /// end-of-stream metadata.
    fn bits_written(&self) -> u64;

    /// Return the position of the next bit to be written in the current word.
    fn pack_pos(&self) -> usize;

    /// Copy `n` bits from `bit_read` to this stream.
    fn copy_from<R: BitRead<Word = Self::Word>>(
        &mut self,
        bit_read: &mut R,
        mut n: u64,
    ) -> Result<(), CopyError<R::Error, Self::Error>> {
        while n > 0 {
            let to_read = core::cmp::min(n, Self::Word::BITS as u64) as usize;
            let read = bit_read.read_bits(to_read).map_err(CopyError::ReadError)?;
            self.write_bits(read, to_read)
                .map_err(CopyError::WriteError)?;
            n -= to_read as u64;
        }
        Ok(())
    }
}
