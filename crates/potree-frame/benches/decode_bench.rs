//! Performance benchmarks for response decoding
//!
//! Decoding is a bounds check and an ASCII scan of the header; the payload
//! is never touched, so cost should not grow with payload size.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use potree_frame::{decode, encode, read_response};

fn create_response(header_size: usize, payload_size: usize) -> Vec<u8> {
    let header = "x".repeat(header_size);
    let payload = vec![0u8; payload_size];
    encode(&header, &payload).unwrap()
}

fn bench_decode_typical_response(c: &mut Criterion) {
    let captured = create_response(512, 64 * 1024);

    c.bench_function("decode_512b_header", |b| {
        b.iter(|| decode(black_box(&captured)))
    });
}

fn bench_decode_various_payload_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_payload_sizes");

    for size in [0, 1024, 65_536, 1_048_576, 16_777_216].iter() {
        let captured = create_response(512, *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &captured, |b, captured| {
            b.iter(|| decode(black_box(captured)))
        });
    }

    group.finish();
}

fn bench_read_response_1mb(c: &mut Criterion) {
    let captured = create_response(512, 1_048_576);

    c.bench_function("read_response_1mb", |b| {
        b.iter(|| read_response(black_box(captured.as_slice())))
    });
}

criterion_group!(
    benches,
    bench_decode_typical_response,
    bench_decode_various_payload_sizes,
    bench_read_response_1mb
);
criterion_main!(benches);
