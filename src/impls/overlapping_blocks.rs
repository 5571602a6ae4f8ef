/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::{ErrorKind, Read};
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The block size and overlap of an [`OverlappingBlocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockParams {
    /// The maximum number of bytes in a block, excluding the overlap.
    pub block_size: usize,
    /// The number of bytes of the previous block kept in front of the
    /// current one.
    pub overlap: usize,
}

impl BlockParams {
    pub const fn new(block_size: usize, overlap: usize) -> Self {
        Self {
            block_size,
            overlap,
        }
    }
}

impl Default for BlockParams {
    fn default() -> Self {
        Self::new(1 << 16, 0)
    }
}

/// Blockwise processing of a [`Read`] in which the last bytes of the previous
/// block remain accessible.
///
/// The bytes of the current block are accessed by indexing with an `isize`
/// in `[0, len)`; the `overlap` bytes preceding the block in the stream
/// are accessed with indices in `[-overlap, 0)`. For the first block the
/// overlap region contains zeros.
///
/// A one-byte lookahead tells whether the current block is the last one, so
/// the stream is never read beyond the bytes we need.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let mut blocks = OverlappingBlocks::new(&b"abcdefgh"[..], 3, 2)?;
/// assert!(blocks.is_first());
/// assert_eq!(blocks.block(), b"abc");
/// assert_eq!(blocks.overlap_region(), [0, 0]);
///
/// assert!(blocks.advance()?);
/// assert_eq!(blocks.block(), b"def");
/// assert_eq!(blocks[-2], b'b');
/// assert_eq!(blocks[-1], b'c');
///
/// assert!(blocks.advance()?);
/// assert_eq!(blocks.block(), b"gh");
/// assert!(blocks.is_last());
/// assert!(!blocks.advance()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct OverlappingBlocks<R: Read> {
    reader: R,
    block_size: usize,
    overlap: usize,
    /// The overlap region followed by the current block.
    buffer: Box<[u8]>,
    /// The length of the current block.
    len: usize,
    /// The offset of the current block in the stream.
    offset: u64,
    /// The first byte of the next block, if any.
    probe: Option<u8>,
}

impl<R: Read> OverlappingBlocks<R> {
    /// Create a new [`OverlappingBlocks`] and load the first block.
    ///
    /// # Panics
    ///
    /// If `block_size` is zero.
    pub fn new(reader: R, block_size: usize, overlap: usize) -> std::io::Result<Self> {
        assert!(block_size > 0, "The block size must be positive");
        let mut this = Self {
            reader,
            block_size,
            overlap,
            buffer: vec![0; overlap + block_size].into_boxed_slice(),
            len: 0,
            offset: 0,
            probe: None,
        };
        this.load(None)?;
        Ok(this)
    }

    /// Create a new [`OverlappingBlocks`] using the given parameters.
    pub fn with_params(reader: R, params: BlockParams) -> std::io::Result<Self> {
        Self::new(reader, params.block_size, params.overlap)
    }

    /// Read into `buf` until it is full or the reader is exhausted, returning
    /// the number of bytes read.
    fn read_full(reader: &mut R, mut buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while !buf.is_empty() {
            match reader.read(buf) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    buf = &mut buf[n..];
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    /// Fill the current block, starting with the byte `first` if present,
    /// and probe the next byte.
    fn load(&mut self, first: Option<u8>) -> std::io::Result<()> {
        let block = &mut self.buffer[self.overlap..];
        let start = match first {
            Some(byte) => {
                block[0] = byte;
                1
            }
            None => 0,
        };
        self.len = start + Self::read_full(&mut self.reader, &mut block[start..])?;

        let mut probe = [0_u8; 1];
        self.probe = match Self::read_full(&mut self.reader, &mut probe)? {
            0 => None,
            _ => Some(probe[0]),
        };
        Ok(())
    }

    /// Load the next block, keeping the last `overlap` bytes in front of it.
    ///
    /// Return false, leaving the current block untouched, if the current
    /// block is the last one.
    pub fn advance(&mut self) -> std::io::Result<bool> {
        if self.is_last() {
            return Ok(false);
        }
        let len = self.len;
        self.buffer.copy_within(len..len + self.overlap, 0);
        self.offset += len as u64;
        self.load(self.probe)?;
        Ok(self.len > 0)
    }

    /// Return the byte at position `index`, which may be negative to access
    /// the overlap region, or `None` if `index` is out of `[-overlap, len)`.
    #[inline]
    pub fn get(&self, index: isize) -> Option<u8> {
        let pos = index.checked_add_unsigned(self.overlap)?;
        if pos < 0 || pos as usize >= self.overlap + self.len {
            return None;
        }
        Some(self.buffer[pos as usize])
    }

    /// Return the bytes of the current block.
    #[inline]
    pub fn block(&self) -> &[u8] {
        &self.buffer[self.overlap..self.overlap + self.len]
    }

    /// Return the overlap region preceding the current block.
    #[inline]
    pub fn overlap_region(&self) -> &[u8] {
        &self.buffer[..self.overlap]
    }

    #[inline]
    pub fn is_first(&self) -> bool {
        self.offset == 0
    }

    /// Return true if the stream has no bytes after the current block.
    #[inline]
    pub fn is_last(&self) -> bool {
        self.probe.is_none()
    }

    /// Return the offset of the current block in the stream.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Return the length of the current block, excluding the overlap.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Index<isize> for OverlappingBlocks<R> {
    type Output = u8;

    #[inline]
    fn index(&self, index: isize) -> &u8 {
        assert!(
            index >= -(self.overlap as isize) && index < self.len as isize,
            "Index {} out of range [-{}, {})",
            index,
            self.overlap,
            self.len
        );
        &self.buffer[(index + self.overlap as isize) as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty() {
        let mut blocks = OverlappingBlocks::new(std::io::empty(), 8, 3).unwrap();
        assert!(blocks.is_first());
        assert!(blocks.is_last());
        assert!(blocks.is_empty());
        assert_eq!(blocks.overlap_region(), [0, 0, 0]);
        assert!(!blocks.advance().unwrap());
    }

    #[test]
    fn test_exact_blocks() {
        // the probe avoids a trailing empty block
        let mut blocks = OverlappingBlocks::new(&[1_u8, 2, 3, 4][..], 2, 1).unwrap();
        assert_eq!(blocks.block(), [1, 2]);
        assert!(!blocks.is_last());
        assert!(blocks.advance().unwrap());
        assert_eq!(blocks.block(), [3, 4]);
        assert_eq!(blocks.offset(), 2);
        assert_eq!(blocks[-1], 2);
        assert!(blocks.is_last());
        assert!(!blocks.advance().unwrap());
        assert_eq!(blocks.block(), [3, 4]);
    }

    #[test]
    fn test_get() {
        let blocks = OverlappingBlocks::new(&b"xyz"[..], 2, 2).unwrap();
        assert_eq!(blocks.get(-3), None);
        assert_eq!(blocks.get(-2), Some(0));
        assert_eq!(blocks.get(1), Some(b'y'));
        assert_eq!(blocks.get(2), None);
        assert_eq!(blocks.get(isize::MAX), None);
        assert_eq!(blocks.get(isize::MIN), None);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let blocks = OverlappingBlocks::new(&b"xyz"[..], 2, 2).unwrap();
        let _ = blocks[2];
    }

    #[test]
    fn test_params() {
        let params = BlockParams::new(100, 10);
        let blocks = OverlappingBlocks::with_params(std::io::repeat(7).take(250), params).unwrap();
        assert_eq!(blocks.block_size(), 100);
        assert_eq!(blocks.overlap(), 10);
        assert_eq!(blocks.len(), 100);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_params_serde() {
        let params = BlockParams::new(100, 10);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"block_size":100,"overlap":10}"#);
        let back: BlockParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
