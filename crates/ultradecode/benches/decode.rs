//! Benchmark – `ultradecode::Decoder`
#![allow(missing_docs)]

use std::{fmt::Write, time::Duration};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ultradecode::{Builder, Decoder, DecoderOptions, PooledScratch, ValueBuilder};

/// A document of `records` small objects mixing every value kind.
fn make_records(records: usize) -> String {
    let mut s = String::from("[");
    for i in 0..records {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"id":{i},"score":{}.25,"name":"user {i}\n","active":{},"tags":["a","b",null]}}"#,
            i % 100,
            i % 2 == 0
        )
        .unwrap();
    }
    s.push(']');
    s
}

/// A single string of `len` bytes, long enough to leave the inline scratch.
fn make_long_string(len: usize) -> String {
    let mut s = String::with_capacity(len + 2);
    s.push('"');
    s.extend(std::iter::repeat_n('a', len));
    s.push('"');
    s
}

/// Discards everything; measures the scanner alone.
struct Sink;

impl Builder for Sink {
    type Value = ();

    fn new_integer(&mut self, _: i64) {}
    fn new_double(&mut self, _: f64) {}
    fn new_string(&mut self, _: &[u8]) {}
    fn new_true(&mut self) {}
    fn new_false(&mut self) {}
    fn new_null(&mut self) {}
    fn new_array(&mut self) {}
    fn new_object(&mut self) {}
    fn array_append(&mut self, _: &mut (), _: ()) {}
    fn object_insert(&mut self, _: &mut (), _: (), _: ()) {}
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");

    for &records in &[10usize, 1_000, 10_000] {
        let payload = make_records(records);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(BenchmarkId::new("value", records), &payload, |b, p| {
            let mut decoder = Decoder::new(ValueBuilder);
            b.iter(|| black_box(decoder.decode(black_box(p.as_bytes())).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("sink", records), &payload, |b, p| {
            let mut decoder = Decoder::new(Sink);
            b.iter(|| black_box(decoder.decode(black_box(p.as_bytes())).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("serde_json", records), &payload, |b, p| {
            b.iter(|| black_box(serde_json::from_str::<serde_json::Value>(black_box(p)).unwrap()));
        });
    }
    group.finish();
}

fn bench_long_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("long_string");
    let payload = make_long_string(1 << 20);
    group.throughput(Throughput::Bytes(payload.len() as u64));

    group.bench_function("global", |b| {
        let mut decoder = Decoder::new(Sink);
        b.iter(|| black_box(decoder.decode(black_box(payload.as_bytes())).unwrap()));
    });
    group.bench_function("pooled", |b| {
        let mut decoder =
            Decoder::with_allocator(Sink, PooledScratch::new(), DecoderOptions::default());
        b.iter(|| black_box(decoder.decode(black_box(payload.as_bytes())).unwrap()));
    });
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_records, bench_long_strings }
criterion_main!(benches);
