/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */
#![cfg(feature = "alloc")]

use bitpack_stream::prelude::{
    BitPacker, BitRead, BitUnpacker, BitWrite, MemWordReader, MemWordWriterVec,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_copy() -> Result<(), Box<dyn std::error::Error>> {
    for len in 0..1000_u64 {
        let mut write = BitPacker::new(MemWordWriterVec::new(Vec::<u64>::new()));

        let mut r = SmallRng::seed_from_u64(0);
        for _ in 0..len {
            write.write_bits(r.random_range(0..2), 1)?;
        }

        let buffer = write.into_inner()?.into_inner();

        let mut read = BitUnpacker::new(MemWordReader::new(buffer))?;

        let mut copy_write = BitPacker::new(MemWordWriterVec::new(Vec::<u64>::new()));

        read.copy_to(&mut copy_write, len)?;
        assert!(read.eof());
        assert_eq!(copy_write.bits_written(), len);

        let mut read = BitUnpacker::new(MemWordReader::new(copy_write.into_inner()?.into_inner()))?;

        let mut copy_write = BitPacker::new(MemWordWriterVec::new(Vec::<u64>::new()));
        copy_write.copy_from(&mut read, len)?;
        assert!(read.eof());

        let mut read = BitUnpacker::new(MemWordReader::new(copy_write.into_inner()?.into_inner()))?;

        let mut r = SmallRng::seed_from_u64(0);
        for _ in 0..len {
            assert_eq!(read.read_bits(1)?, r.random_range(0..2));
        }
        assert!(read.eof());
    }

    Ok(())
}

#[test]
fn test_copy_wide_fields() -> Result<(), Box<dyn std::error::Error>> {
    let mut write = BitPacker::new(MemWordWriterVec::new(Vec::<u64>::new()));
    let mut r = SmallRng::seed_from_u64(1);
    let values: Vec<u64> = (0..100).map(|_| r.random()).collect();
    for &value in &values {
        write.write_bits(value, 64)?;
    }
    write.write_bits(0b101, 3)?;
    let buffer = write.into_inner()?.into_inner();

    // copy with a different alignment
    let mut read = BitUnpacker::new(MemWordReader::new(buffer))?;
    let mut copy_write = BitPacker::new(MemWordWriterVec::new(Vec::<u64>::new()));
    copy_write.write_bits(1, 1)?;
    read.copy_to(&mut copy_write, 6403)?;
    assert!(read.eof());

    let mut read = BitUnpacker::new(MemWordReader::new(copy_write.into_inner()?.into_inner()))?;
    assert_eq!(read.read_bits(1)?, 1);
    for &value in &values {
        assert_eq!(read.read_bits(64)?, value);
    }
    assert_eq!(read.read_bits(3)?, 0b101);
    assert!(read.eof());
    Ok(())
}
