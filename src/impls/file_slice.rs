/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::Path;

/// A buffered reader over the bytes in a range of a file.
///
/// The range is clamped to the length of the file at opening time. All
/// positions, including those of [`Seek`], are relative to the start of the
/// range, and reads stop at its end. Seeking past the end is allowed, and
/// subsequent reads return no bytes.
///
/// Together with [`WordAdapter`](crate::impls::WordAdapter), a [`FileSlice`]
/// makes it possible to unpack a bit stream stored inside a larger file.
///
/// # Example
/// ```
/// use bitpack_stream::prelude::*;
/// use std::io::Read;
///
/// let path = std::env::temp_dir().join("bitpack_stream_doc_file_slice");
/// std::fs::write(&path, b"0123456789")?;
///
/// let mut slice = FileSlice::open_range(&path, 2..5)?;
/// let mut content = String::new();
/// slice.read_to_string(&mut content)?;
/// assert_eq!(content, "234");
///
/// std::fs::remove_file(&path)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FileSlice {
    reader: BufReader<File>,
    /// The start of the range in the file.
    begin: u64,
    /// The length of the range.
    len: u64,
    /// The current position, relative to `begin`.
    pos: u64,
}

impl FileSlice {
    /// The default capacity of the internal buffer.
    pub const DEFAULT_CAPACITY: usize = 16 * 1024;

    /// Open a whole file.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::open_range(path, 0..u64::MAX)
    }

    /// Open the bytes of a file in `range`.
    pub fn open_range(path: impl AsRef<Path>, range: Range<u64>) -> std::io::Result<Self> {
        Self::with_capacity(Self::DEFAULT_CAPACITY, path, range)
    }

    /// Open the bytes of a file in `range`, using a buffer with the given
    /// capacity.
    pub fn with_capacity(
        capacity: usize,
        path: impl AsRef<Path>,
        range: Range<u64>,
    ) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let end = range.end.min(file.metadata()?.len());
        let begin = range.start.min(end);
        let mut reader = BufReader::with_capacity(capacity, file);
        reader.seek(SeekFrom::Start(begin))?;
        Ok(Self {
            reader,
            begin,
            len: end - begin,
            pos: 0,
        })
    }

    /// Return the length of the range.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the start of the range in the file.
    #[inline]
    pub fn begin(&self) -> u64 {
        self.begin
    }

    /// Return the current position, relative to the start of the range.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline(always)]
    fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    pub fn into_inner(self) -> BufReader<File> {
        self.reader
    }
}

impl Read for FileSlice {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let max = self.remaining().min(buf.len() as u64) as usize;
        if max == 0 {
            return Ok(0);
        }
        let n = self.reader.read(&mut buf[..max])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl BufRead for FileSlice {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(&[]);
        }
        let buf = self.reader.fill_buf()?;
        let n = (buf.len() as u64).min(remaining) as usize;
        Ok(&buf[..n])
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
        self.pos += amt as u64;
    }
}

impl Seek for FileSlice {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        }
        .ok_or_else(|| {
            std::io::Error::new(
                ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;

        match i64::try_from(target as i128 - self.pos as i128) {
            // keeps the buffer if the target is inside it
            Ok(delta) => self.reader.seek_relative(delta)?,
            Err(_) => {
                let absolute = self.begin.checked_add(target).ok_or_else(|| {
                    std::io::Error::new(ErrorKind::InvalidInput, "seek position overflows")
                })?;
                self.reader.seek(SeekFrom::Start(absolute))?;
            }
        }
        self.pos = target;
        Ok(target)
    }

    fn stream_position(&mut self) -> std::io::Result<u64> {
        Ok(self.pos)
    }
}

/// Load the whole content of a file.
pub fn load_file(path: impl AsRef<Path>) -> std::io::Result<Vec<u8>> {
    let mut slice = FileSlice::open(path)?;
    let mut content = Vec::with_capacity(slice.len() as usize);
    slice.read_to_end(&mut content)?;
    Ok(content)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("bitpack_stream_test_missing_file");
        let _ = std::fs::remove_file(&path);
        let err = FileSlice::open(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(load_file(&path).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_clamping() {
        let path = std::env::temp_dir().join("bitpack_stream_test_clamping");
        std::fs::write(&path, [1_u8, 2, 3, 4, 5]).unwrap();

        let slice = FileSlice::open_range(&path, 3..100).unwrap();
        assert_eq!((slice.begin(), slice.len()), (3, 2));

        let mut slice = FileSlice::open_range(&path, 10..20).unwrap();
        assert_eq!((slice.begin(), slice.len()), (5, 0));
        assert!(slice.is_empty());
        assert!(slice.fill_buf().unwrap().is_empty());

        let slice = FileSlice::open_range(&path, 4..2).unwrap();
        assert!(slice.is_empty());

        assert_eq!(load_file(&path).unwrap(), [1, 2, 3, 4, 5]);
        std::fs::remove_file(&path).unwrap();
    }
}
