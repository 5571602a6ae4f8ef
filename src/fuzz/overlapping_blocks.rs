/*
 * SPDX-FileCopyrightText: 2023 Inria
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::prelude::*;
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
pub struct FuzzCase {
    data: Vec<u8>,
    block_size: u8,
    overlap: u8,
}

pub fn harness(data: FuzzCase) {
    let block_size = 1 + data.block_size as usize % 64;
    let overlap = data.overlap as usize % 32;
    let mut blocks = OverlappingBlocks::new(&data.data[..], block_size, overlap).unwrap();
    let mut seen = vec![];
    loop {
        let offset = blocks.offset() as usize;
        assert_eq!(offset, seen.len());
        assert_eq!(blocks.is_first(), offset == 0);
        assert_eq!(blocks.block(), &data.data[offset..offset + blocks.len()]);
        assert_eq!(blocks.is_last(), offset + blocks.len() == data.data.len());

        for i in 1..=overlap {
            let expected = offset.checked_sub(i).map_or(0, |j| data.data[j]);
            assert_eq!(blocks[-(i as isize)], expected);
        }
        assert_eq!(blocks.get(-(overlap as isize) - 1), None);
        assert_eq!(blocks.get(blocks.len() as isize), None);

        seen.extend_from_slice(blocks.block());
        if !blocks.advance().unwrap() {
            break;
        }
    }
    assert_eq!(seen, data.data);
}
