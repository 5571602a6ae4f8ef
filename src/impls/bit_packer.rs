/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::mem::ManuallyDrop;

use crate::traits::*;
use crate::utils::{encode_finalizer, payload_bits};

/// An implementation of [`BitWrite`] packing bits into the words of a
/// [`WordWrite`].
///
/// Bits are packed from the least significant bit of each word upwards, and a
/// word is written to the backend as soon as it is full.
///
/// Unless built with [`without_finalizer`](BitPacker::without_finalizer), the
/// packer terminates the stream with a finalizer recording how many bits of
/// the last word are valid, so that a [`BitUnpacker`](crate::impls::BitUnpacker)
/// can detect the end of the stream exactly. The finalizer is written once,
/// by the first of [`close`](BitPacker::close),
/// [`into_inner`](BitPacker::into_inner), or drop. Errors happening during a
/// drop are lost: call [`close`](BitPacker::close) to see them.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let mut words: Vec<u64> = vec![];
/// let mut packer = BitPacker::new(MemWordWriterVec::new(&mut words));
/// packer.write_bit(false)?;
/// packer.write_bit(true)?;
/// packer.write_bits(0b1011, 4)?;
/// packer.close()?;
/// drop(packer);
///
/// // six valid bits, with the finalizer in the upper bits
/// assert_eq!(words, vec![0b101110 | 5 << 57]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct BitPacker<WW: WordWrite> {
    /// The [`WordWrite`] to which we write words.
    backend: WW,
    /// The word being filled.
    pack: WW::Word,
    /// The number of bits of `pack` already used, always less than the word
    /// size.
    pos: usize,
    bits_written: u64,
    finalize: bool,
    /// Whether at least one word reached the backend.
    emitted: bool,
    closed: bool,
}

impl<WW: WordWrite> BitPacker<WW> {
    /// Create a new [`BitPacker`] that will write a finalizer when closed.
    #[must_use]
    pub fn new(backend: WW) -> Self {
        Self::with_finalizer(backend, true)
    }

    /// Create a new [`BitPacker`] that on close will just write out the
    /// last partial word, padded with zeros.
    ///
    /// The resulting stream must be read with
    /// [`BitUnpacker::new_unbounded`](crate::impls::BitUnpacker::new_unbounded).
    #[must_use]
    pub fn without_finalizer(backend: WW) -> Self {
        Self::with_finalizer(backend, false)
    }

    /// Create a new [`BitPacker`], writing a finalizer when closed only if
    /// `finalize` is true.
    #[must_use]
    pub fn with_finalizer(backend: WW, finalize: bool) -> Self {
        Self {
            backend,
            pack: WW::Word::ZERO,
            pos: 0,
            bits_written: 0,
            finalize,
            emitted: false,
            closed: false,
        }
    }

    #[inline(always)]
    fn emit(&mut self) -> Result<(), WW::Error> {
        self.backend.write_word(self.pack)?;
        self.emitted = true;
        self.pack = WW::Word::ZERO;
        self.pos = 0;
        Ok(())
    }

    /// Terminate the stream, writing the finalizer or the last partial word,
    /// and flush the backend.
    ///
    /// Calling this method more than once has no further effect. No bits can
    /// be written after this call.
    pub fn close(&mut self) -> Result<(), WW::Error> {
        if self.closed {
            return Ok(());
        }
        // a failure below must not lead to a second finalizer on drop
        self.closed = true;

        if self.finalize {
            if self.pos > 0 || self.emitted {
                let valid_bits = if self.pos > 0 {
                    self.pos
                } else {
                    WW::Word::BITS
                };
                if self.pos >= payload_bits::<WW::Word>() {
                    self.emit()?;
                }
                self.pack = self.pack | encode_finalizer::<WW::Word>(valid_bits);
                self.emit()?;
            }
        } else if self.pos > 0 {
            self.emit()?;
        }

        self.backend.flush()
    }

    /// Close the stream and return the backend.
    ///
    /// If closing fails, the backend is dropped and the error is returned.
    pub fn into_inner(self) -> Result<WW, WW::Error> {
        let mut this = ManuallyDrop::new(self);
        let res = this.close();
        // SAFETY: `this` is never used or dropped again, and `backend` is the
        // only field owning resources.
        let backend = unsafe { core::ptr::read(&this.backend) };
        res.map(|()| backend)
    }

    /// Return whether the stream has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<WW: WordWrite> core::ops::Drop for BitPacker<WW> {
    fn drop(&mut self) {
        // During a drop we can't save anything if it goes bad :/
        let _ = self.close();
    }
}

impl<WW: WordWrite> BitWrite for BitPacker<WW> {
    type Error = WW::Error;
    type Word = WW::Word;

    #[inline]
    fn write_bit(&mut self, bit: bool) -> Result<(), Self::Error> {
        debug_assert!(!self.closed, "Write on a closed BitPacker");
        if bit {
            self.pack = self.pack | (WW::Word::ONE << self.pos);
        }
        self.pos += 1;
        self.bits_written += 1;
        if self.pos == WW::Word::BITS {
            self.emit()?;
        }
        Ok(())
    }

    #[inline]
    fn write_bits(&mut self, value: WW::Word, n: usize) -> Result<usize, Self::Error> {
        assert!(
            n > 0 && n <= WW::Word::BITS,
            "The number of bits to write has to be in [1, {}] and {} is not",
            WW::Word::BITS,
            n
        );
        debug_assert!(!self.closed, "Write on a closed BitPacker");

        let mask = low_mask::<WW::Word>(n);
        #[cfg(feature = "checks")]
        assert!(
            value & !mask == WW::Word::ZERO,
            "Error: value {} does not fit in {} bits",
            value,
            n
        );
        let value = value & mask;

        let space = WW::Word::BITS - self.pos;
        self.pack = self.pack | (value << self.pos);
        self.bits_written += n as u64;
        if n < space {
            self.pos += n;
            return Ok(n);
        }

        self.emit()?;
        if n > space {
            // space < n <= BITS, so the shift is in range
            self.pack = value >> space;
            self.pos = n - space;
        }
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.pos > 0 {
            self.emit()?;
        }
        Ok(())
    }

    #[inline(always)]
    fn bits_written(&self) -> u64 {
        self.bits_written
    }

    #[inline(always)]
    fn pack_pos(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::impls::{MemWordWriterSlice, MemWordWriterVec};
    use crate::utils::decode_finalizer;

    fn pack_ones(n: usize) -> Vec<u64> {
        let mut words: Vec<u64> = vec![];
        let mut packer = BitPacker::new(MemWordWriterVec::new(&mut words));
        for _ in 0..n {
            packer.write_bit(true).unwrap();
        }
        packer.close().unwrap();
        drop(packer);
        words
    }

    #[test]
    fn test_finalizer_boundaries() {
        let words = pack_ones(57);
        assert_eq!(words.len(), 1);
        assert_eq!(decode_finalizer(words[0]), 57);

        // the payload reaches the finalizer: an extra word is needed
        let words = pack_ones(58);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], (1 << 58) - 1);
        assert_eq!(decode_finalizer(words[1]), 58);

        let words = pack_ones(64);
        assert_eq!(words, vec![u64::MAX, 63 << 57]);

        let words = pack_ones(65);
        assert_eq!(words, vec![u64::MAX, 1]);
    }

    #[test]
    fn test_empty() {
        assert!(pack_ones(0).is_empty());

        let mut words: Vec<u64> = vec![];
        let packer = BitPacker::without_finalizer(MemWordWriterVec::new(&mut words));
        drop(packer);
        assert!(words.is_empty());
    }

    #[test]
    fn test_positions() {
        let mut words: Vec<u64> = vec![];
        let mut packer = BitPacker::new(MemWordWriterVec::new(&mut words));
        packer.write_bits(0xabc, 12).unwrap();
        assert_eq!(packer.pack_pos(), 12);
        assert_eq!(packer.bits_written(), 12);
        packer.write_bits(0b10101, 5).unwrap();
        assert_eq!(packer.pack_pos(), 17);
        assert_eq!(packer.bits_written(), 17);
        packer.write_bits(u64::MAX, 64).unwrap();
        assert_eq!(packer.pack_pos(), 17);
        assert_eq!(packer.bits_written(), 81);
        packer.write_bits(0, 47).unwrap();
        assert_eq!(packer.pack_pos(), 0);
        assert_eq!(packer.bits_written(), 128);
        let words = packer.into_inner().unwrap().into_inner();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0], 0xabc | 0b10101 << 12 | u64::MAX << 17);
        assert_eq!(words[1], (1 << 17) - 1);
        assert_eq!(words[2], 63 << 57);
    }

    #[test]
    fn test_close_once() {
        let mut words: Vec<u64> = vec![];
        let mut packer = BitPacker::new(MemWordWriterVec::new(&mut words));
        packer.write_bits(3, 2).unwrap();
        packer.close().unwrap();
        packer.close().unwrap();
        assert!(packer.is_closed());
        drop(packer);
        assert_eq!(words, vec![3 | 1 << 57]);
    }

    #[test]
    fn test_flush_and_no_finalizer() {
        let mut words: Vec<u64> = vec![];
        let mut packer = BitPacker::without_finalizer(MemWordWriterVec::new(&mut words));
        packer.write_bits(0b11, 2).unwrap();
        packer.flush().unwrap();
        assert_eq!(packer.pack_pos(), 0);
        // flushing an empty word does nothing
        packer.flush().unwrap();
        packer.write_bits(0b101, 3).unwrap();
        drop(packer);
        assert_eq!(words, vec![0b11, 0b101]);
    }

    #[test]
    fn test_sink_error() {
        let mut words = [0_u64; 1];
        let mut packer = BitPacker::new(MemWordWriterSlice::new(&mut words));
        packer.write_bits(u64::MAX, 64).unwrap();
        // the finalizer-only word does not fit
        assert_eq!(
            packer.close(),
            Err(WordError::UnexpectedEof { word_pos: 1 })
        );
        assert!(packer.is_closed());
    }

    #[test]
    fn test_small_words() {
        let mut words: Vec<u8> = vec![];
        let mut packer = BitPacker::new(MemWordWriterVec::new(&mut words));
        packer.write_bits(0b1_0110, 5).unwrap();
        packer.write_bits(0b1, 1).unwrap();
        drop(packer);
        // payload_bits::<u8>() is 5, so the finalizer needs an extra word
        assert_eq!(words, vec![0b11_0110, 5 << 4]);
    }

    /// A backend rejecting every word and recording its own drop.
    struct Rejecting<'a>(&'a core::cell::Cell<bool>);

    impl WordWrite for Rejecting<'_> {
        type Error = WordError;
        type Word = u64;

        fn write_word(&mut self, _word: u64) -> Result<(), WordError> {
            Err(WordError::UnexpectedEof { word_pos: 0 })
        }

        fn flush(&mut self) -> Result<(), WordError> {
            Ok(())
        }
    }

    impl Drop for Rejecting<'_> {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn test_into_inner_error_drops_backend() {
        let dropped = core::cell::Cell::new(false);
        let mut packer = BitPacker::new(Rejecting(&dropped));
        packer.write_bits(5, 3).unwrap();
        assert!(packer.into_inner().is_err());
        assert!(dropped.get());

        let dropped = core::cell::Cell::new(false);
        let packer = BitPacker::without_finalizer(Rejecting(&dropped));
        // nothing to write, so closing succeeds
        let backend = packer.into_inner().unwrap();
        assert!(!dropped.get());
        drop(backend);
        assert!(dropped.get());
    }

    #[cfg(feature = "checks")]
    #[test]
    #[should_panic]
    fn test_value_too_wide() {
        let mut words: Vec<u64> = vec![];
        let mut packer = BitPacker::new(MemWordWriterVec::new(&mut words));
        let _ = packer.write_bits(0b1000, 3);
    }

    #[cfg(not(feature = "checks"))]
    #[test]
    fn test_value_masked() {
        // without checks, the bits above the width are ignored
        let mut words: Vec<u64> = vec![];
        let mut packer = BitPacker::new(MemWordWriterVec::new(&mut words));
        packer.write_bits(0b1101, 3).unwrap();
        drop(packer);
        assert_eq!(words, vec![0b101 | 2 << 57]);
    }

    #[test]
    #[should_panic]
    fn test_zero_width() {
        let mut words = vec![];
        let mut packer = BitPacker::new(MemWordWriterVec::<u64, _>::new(&mut words));
        let _ = packer.write_bits(0, 0);
    }
}
