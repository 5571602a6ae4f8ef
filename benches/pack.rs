use criterion::{Criterion, criterion_group, criterion_main};
use bitpack_stream::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const FIELDS: usize = 100_000;

fn random_fields() -> Vec<(u64, usize)> {
    let mut r = SmallRng::seed_from_u64(0);
    (0..FIELDS)
        .map(|_| {
            let width = r.random_range(1..=64);
            (r.random::<u64>() & low_mask::<u64>(width), width)
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let fields = random_fields();

    c.bench_function("write_bits", |b| {
        b.iter(|| {
            let mut words = Vec::<u64>::with_capacity(FIELDS);
            let mut writer = BitPacker::new(MemWordWriterVec::new(&mut words));
            for &(value, width) in &fields {
                let _ = writer.write_bits(black_box(value), width);
            }
            let _ = writer.close();
            drop(writer);
            black_box(words)
        })
    });

    let mut words = Vec::<u64>::new();
    let mut writer = BitPacker::new(MemWordWriterVec::new(&mut words));
    for &(value, width) in &fields {
        let _ = writer.write_bits(value, width);
    }
    drop(writer);

    c.bench_function("read_bits", |b| {
        b.iter(|| {
            let mut reader = BitUnpacker::new(MemWordReader::new(&words)).unwrap();
            let mut acc = 0;
            for &(_, width) in &fields {
                acc ^= reader.read_bits(width).unwrap();
            }
            black_box(acc)
        })
    });

    c.bench_function("read_bit", |b| {
        b.iter(|| {
            let mut reader = BitUnpacker::new(MemWordReader::new(&words)).unwrap();
            let mut ones = 0_u64;
            while reader.good() {
                ones += reader.read_bit().unwrap() as u64;
            }
            black_box(ones)
        })
    });

    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
    c.bench_function("read_bits_from_bytes", |b| {
        b.iter(|| {
            let mut reader = bit_reader_from(&bytes[..]).unwrap();
            let mut acc = 0;
            for &(_, width) in &fields {
                acc ^= reader.read_bits(width).unwrap();
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
