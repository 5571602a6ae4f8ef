/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::fs::File;
use std::io::ErrorKind;
use std::ops::{Deref, Range};
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

/// A read-only memory mapping of the bytes in a range of a file.
///
/// The range is clamped to the length of the file, exactly as in
/// [`FileSlice`](crate::impls::FileSlice). The mapped bytes are available as
/// a slice, so they can be fed to a
/// [`BytesToWords`](crate::impls::BytesToWords), to a
/// [`MemWordReader`](crate::impls::MemWordReader) after conversion, or to an
/// [`OverlappingBlocks`](crate::impls::OverlappingBlocks).
///
/// An empty range maps nothing.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
///
/// let path = std::env::temp_dir().join("bitpack_stream_doc_mmap_file");
/// std::fs::write(&path, b"0123456789")?;
///
/// let mmap = MemoryMappedFile::open_range(&path, 2..5)?;
/// assert_eq!(&mmap[..], b"234");
/// assert_eq!(mmap.begin(), 2);
///
/// let mmap = MemoryMappedFile::open_range(&path, 8..100)?;
/// assert_eq!(&mmap[..], b"89");
///
/// drop(mmap);
/// std::fs::remove_file(&path)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct MemoryMappedFile {
    /// The mapping, absent if the range is empty.
    mmap: Option<Mmap>,
    /// The start of the range in the file.
    begin: u64,
}

impl MemoryMappedFile {
    /// Map a whole file.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::open_range(path, 0..u64::MAX)
    }

    /// Map the bytes of a file in `range`.
    pub fn open_range(path: impl AsRef<Path>, range: Range<u64>) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let end = range.end.min(file.metadata()?.len());
        let begin = range.start.min(end);
        let len = usize::try_from(end - begin).map_err(|_| {
            std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("Range of {} bytes too large to be mapped", end - begin),
            )
        })?;

        let mmap = if len == 0 {
            None
        } else {
            // SAFETY: the mapping is read-only; as with any file mapping,
            // the content is undefined if the file is modified while mapped.
            Some(unsafe { MmapOptions::new().offset(begin).len(len).map(&file)? })
        };
        Ok(Self { mmap, begin })
    }

    /// Return the mapped bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// Return the start of the range in the file.
    #[inline]
    pub fn begin(&self) -> u64 {
        self.begin
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_none()
    }
}

impl Deref for MemoryMappedFile {
    type Target = [u8];

    #[inline(always)]
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for MemoryMappedFile {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamping() {
        let path = std::env::temp_dir().join("bitpack_stream_test_mmap_clamping");
        std::fs::write(&path, [1_u8, 2, 3, 4, 5]).unwrap();

        let mmap = MemoryMappedFile::open(&path).unwrap();
        assert_eq!(&mmap[..], [1, 2, 3, 4, 5]);

        let mmap = MemoryMappedFile::open_range(&path, 3..100).unwrap();
        assert_eq!(mmap.as_slice(), [4, 5]);
        assert_eq!(mmap.begin(), 3);

        let mmap = MemoryMappedFile::open_range(&path, 10..20).unwrap();
        assert!(mmap.is_empty());
        assert_eq!(mmap.begin(), 5);
        assert_eq!(mmap.len(), 0);

        let mmap = MemoryMappedFile::open_range(&path, 4..2).unwrap();
        assert!(mmap.is_empty());
        assert_eq!(mmap.begin(), 2);

        drop(mmap);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        assert!(MemoryMappedFile::open("/this/file/does/not/exist").is_err());
    }
}
