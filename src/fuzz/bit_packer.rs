/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    commands: Vec<RandomCommand>,
    finalize: bool,
}

#[derive(Arbitrary, Debug)]
pub enum RandomCommand {
    WriteBit(bool),
    WriteBits(u64, u8),
    Flush,
}

pub fn harness(data: FuzzCase) {
    let mut words: Vec<u64> = vec![];
    // the expected bits, in stream order
    let mut bits: Vec<bool> = vec![];

    let mut writer = BitPacker::with_finalizer(MemWordWriterVec::new(&mut words), data.finalize);
    for command in &data.commands {
        match command {
            RandomCommand::WriteBit(bit) => {
                writer.write_bit(*bit).unwrap();
                bits.push(*bit);
            }
            RandomCommand::WriteBits(value, n) => {
                let n = 1 + (*n as usize % 64);
                let value = *value & low_mask::<u64>(n);
                assert_eq!(writer.write_bits(value, n).unwrap(), n);
                bits.extend((0..n).map(|i| (value >> i) & 1 == 1));
            }
            RandomCommand::Flush => {
                let pos = writer.pack_pos();
                writer.flush().unwrap();
                if pos > 0 {
                    bits.resize(bits.len() + 64 - pos, false);
                }
            }
        }
        assert_eq!(writer.pack_pos(), bits.len() % 64);
    }
    writer.close().unwrap();
    drop(writer);

    // go through the bytes as well
    let mut bytes = WordsToBytes::<u64, Vec<u8>>::new(vec![]);
    for &word in &words {
        bytes.write_word(word).unwrap();
    }
    let bytes = bytes.into_inner();
    assert_eq!(bytes.len(), words.len() * 8);

    if data.finalize {
        let mut reader = BitUnpacker::new(MemWordReader::new(&words)).unwrap();
        let mut byte_reader = BitUnpacker::new(BytesToWords::<u64, _>::new(bytes.into_iter())).unwrap();
        for &bit in &bits {
            assert!(!reader.eof());
            assert!(!byte_reader.eof());
            assert_eq!(reader.read_bit().unwrap(), bit);
            assert_eq!(byte_reader.read_bit().unwrap(), bit);
        }
        assert!(reader.eof());
        assert!(byte_reader.eof());
    } else {
        assert_eq!(words.len(), bits.len().div_ceil(64));
        let mut reader = BitUnpacker::new_unbounded(MemWordReader::new(&words));
        for &bit in &bits {
            assert_eq!(reader.read_bit().unwrap(), bit);
        }
    }
}
