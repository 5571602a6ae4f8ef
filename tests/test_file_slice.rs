/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */
#![cfg(feature = "std")]

use anyhow::Result;
use bitpack_stream::prelude::*;
use std::io::{BufRead, ErrorKind, Read, Seek, SeekFrom};
use std::path::PathBuf;

fn create(name: &str, len: usize) -> Result<(PathBuf, Vec<u8>)> {
    let path = std::env::temp_dir().join(name);
    let data: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
    std::fs::write(&path, &data)?;
    Ok((path, data))
}

#[test]
fn test_whole_file() -> Result<()> {
    let (path, data) = create("bitpack_stream_test_whole_file", 100_000)?;
    let mut slice = FileSlice::with_capacity(1000, &path, 0..u64::MAX)?;
    assert_eq!(slice.len(), data.len() as u64);
    let mut content = vec![];
    slice.read_to_end(&mut content)?;
    assert_eq!(content, data);
    assert_eq!(slice.position(), data.len() as u64);
    assert_eq!(load_file(&path)?, data);
    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_seek() -> Result<()> {
    let (path, data) = create("bitpack_stream_test_seek", 10_000)?;
    let mut slice = FileSlice::with_capacity(64, &path, 1000..2000)?;
    let mut buf = [0_u8; 10];

    assert_eq!(slice.seek(SeekFrom::Start(500))?, 500);
    slice.read_exact(&mut buf)?;
    assert_eq!(buf, data[1500..1510]);

    assert_eq!(slice.seek(SeekFrom::Current(-20))?, 490);
    slice.read_exact(&mut buf)?;
    assert_eq!(buf, data[1490..1500]);

    assert_eq!(slice.seek(SeekFrom::End(-10))?, 990);
    slice.read_exact(&mut buf)?;
    assert_eq!(buf, data[1990..2000]);
    // reads stop at the end of the range
    assert_eq!(slice.read(&mut buf)?, 0);
    assert!(slice.fill_buf()?.is_empty());

    // far seeks and seeks past the end
    assert_eq!(slice.seek(SeekFrom::Start(3))?, 3);
    assert_eq!(slice.stream_position()?, 3);
    slice.read_exact(&mut buf)?;
    assert_eq!(buf, data[1003..1013]);
    assert_eq!(slice.seek(SeekFrom::End(5))?, 1005);
    assert_eq!(slice.read(&mut buf)?, 0);

    let err = slice.seek(SeekFrom::Current(-2000)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(slice.position(), 1005);

    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_buf_read() -> Result<()> {
    let (path, data) = create("bitpack_stream_test_buf_read", 1000)?;
    let mut slice = FileSlice::with_capacity(16, &path, 100..150)?;
    let mut content = vec![];
    loop {
        let buf = slice.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        assert!(buf.len() <= 16);
        let n = buf.len();
        content.extend_from_slice(buf);
        slice.consume(n);
    }
    assert_eq!(content, data[100..150]);
    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_words_in_slice() -> Result<()> {
    let path = std::env::temp_dir().join("bitpack_stream_test_words_in_slice");
    let mut bytes = b"header".to_vec();
    {
        let mut writer = bit_writer_to(&mut bytes);
        for i in 0..100_u64 {
            writer.write_bits(i, 7)?;
        }
        writer.close()?;
    }
    let end = bytes.len() as u64;
    bytes.extend_from_slice(b"trailer");
    std::fs::write(&path, &bytes)?;

    let mut reader = bit_reader_from(FileSlice::open_range(&path, 6..end)?)?;
    for i in 0..100_u64 {
        assert_eq!(reader.read_bits(7)?, i);
    }
    assert!(reader.eof());

    std::fs::remove_file(&path)?;
    Ok(())
}
