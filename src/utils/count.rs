/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

/// Wrapping struct that keep tracks of written bits. Optionally,
/// prints to standard error information about methods called.
#[derive(Debug, Clone)]
pub struct CountBitWriter<BW: BitWrite, const PRINT: bool = false> {
    bit_write: BW,
    /// The number of bits written so far on the underlying [`BitWrite`].
    pub bits_written: u64,
}

impl<BW: BitWrite, const PRINT: bool> CountBitWriter<BW, PRINT> {
    pub fn new(bit_write: BW) -> Self {
        Self {
            bit_write,
            bits_written: 0,
        }
    }

    pub fn into_inner(self) -> BW {
        self.bit_write
    }
}

impl<BW: BitWrite, const PRINT: bool> BitWrite for CountBitWriter<BW, PRINT> {
    type Error = BW::Error;
    type Word = BW::Word;

    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error> {
        self.bit_write.write_bit(bit).map(|()| {
            self.bits_written += 1;
            if PRINT {
                eprintln!("write_bit({}) (total = {})", bit, self.bits_written);
            }
        })
    }

    fn write_bits(&mut self, value: Self::Word, n: usize) -> Result<usize, Self::Error> {
        self.bit_write.write_bits(value, n).map(|x| {
            self.bits_written += x as u64;
            if PRINT {
                eprintln!(
                    "write_bits({:#x}, {}) = {} (total = {})",
                    value,
                    n,
                    x,
                    self.bits_written
                );
            }
            x
        })
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if PRINT {
            eprintln!("flush() (total = {})", self.bits_written);
        }
        self.bit_write.flush()
    }

    #[inline(always)]
    fn bits_written(&self) -> u64 {
        self.bit_write.bits_written()
    }

    #[inline(always)]
    fn pack_pos(&self) -> usize {
        self.bit_write.pack_pos()
    }
}

/// Wrapping struct that keep tracks of read bits. Optionally,
/// prints to standard error information about methods called.
#[derive(Debug, Clone)]
pub struct CountBitReader<BR: BitRead, const PRINT: bool = false> {
    bit_read: BR,
    /// The number of bits read so far from the underlying [`BitRead`].
    pub bits_read: u64,
}

impl<BR: BitRead, const PRINT: bool> CountBitReader<BR, PRINT> {
    pub fn new(bit_read: BR) -> Self {
        Self {
            bit_read,
            bits_read: 0,
        }
    }

    pub fn into_inner(self) -> BR {
        self.bit_read
    }
}

impl<BR: BitRead, const PRINT: bool> BitRead for CountBitReader<BR, PRINT> {
    type Error = BR::Error;
    type Word = BR::Word;

    fn read_bit(&mut self) -> Result<bool, Self::Error> {
        self.bit_read.read_bit().map(|x| {
            self.bits_read += 1;
            if PRINT {
                eprintln!("read_bit() = {} (total = {})", x, self.bits_read);
            }
            x
        })
    }

    fn read_bits(&mut self, n: usize) -> Result<Self::Word, Self::Error> {
        self.bit_read.read_bits(n).map(|x| {
            self.bits_read += n as u64;
            if PRINT {
                eprintln!(
                    "read_bits({}) = {:#x} (total = {})",
                    n,
                    x,
                    self.bits_read
                );
            }
            x
        })
    }

    #[inline(always)]
    fn pack_pos(&self) -> usize {
        self.bit_read.pack_pos()
    }

    #[inline(always)]
    fn eof(&self) -> bool {
        self.bit_read.eof()
    }
}
