/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Layout and coding of the finalizer, the end-of-stream marker that a
//! [`BitPacker`](crate::impls::BitPacker) embeds in the last word of a
//! stream.
//!
//! The finalizer stores `n - 1`, where `n` in `1..=W::BITS` is the number of
//! valid bits in the last word, shifted left by one less than
//! [`payload_bits`]. With `u64` words the finalizer takes six bits and is
//! shifted by 57, so payload bits 0..57 of a final word can coexist with it.
//!
//! If the payload of the last word reaches [`payload_bits`], the finalizer
//! goes in an extra word. When decoding the lookahead word of a
//! [`BitUnpacker`](crate::impls::BitUnpacker), a count of at least
//! [`payload_bits`] thus means that the lookahead is such an extra word and
//! that the count applies to the word before it.

use crate::traits::Word;

/// Return the number of bits needed to store a finalizer for words of type
/// `W`, that is, the bit width of `W::BITS - 1`.
#[inline(always)]
#[must_use]
pub const fn finalizer_bits_for(word_bits: usize) -> usize {
    (usize::BITS - (word_bits - 1).leading_zeros()) as usize
}

/// Return the number of bits needed to store a finalizer in a `W`.
#[inline(always)]
#[must_use]
pub fn finalizer_bits<W: Word>() -> usize {
    finalizer_bits_for(W::BITS)
}

/// Return the number of bits of a `W` that can carry payload without
/// colliding with the finalizer.
#[inline(always)]
#[must_use]
pub fn payload_bits<W: Word>() -> usize {
    W::BITS - finalizer_bits::<W>()
}

#[inline(always)]
fn finalizer_shift<W: Word>() -> usize {
    payload_bits::<W>() - 1
}

/// Encode a finalizer for a final word containing `valid_bits` valid bits.
///
/// `valid_bits` must be in `1..=W::BITS`.
#[inline]
#[must_use]
pub fn encode_finalizer<W: Word>(valid_bits: usize) -> W {
    debug_assert!(
        valid_bits > 0 && valid_bits <= W::BITS,
        "The number of valid bits has to be in [1, {}] and {} is not",
        W::BITS,
        valid_bits
    );
    W::cast_from_usize(valid_bits - 1) << finalizer_shift::<W>()
}

/// Decode the number of valid bits from a word containing a finalizer.
///
/// The result is in `1..=W::BITS`.
#[inline]
#[must_use]
pub fn decode_finalizer<W: Word>(word: W) -> usize {
    match ((word >> finalizer_shift::<W>()).cast_to_usize() + 1) % W::BITS {
        // n - 1 wrapped around: the whole word was valid
        0 => W::BITS,
        valid_bits => valid_bits,
    }
}
