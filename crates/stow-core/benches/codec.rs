use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stow_core::codec::{
    decode_reference, encode_reference, generate_key, unwrap_receipt_handle, wrap_receipt_handle,
};
use stow_core::size::message_size;
use stow_core::{Attributes, MessageAttribute};

/// Benchmark size estimation, the per-send offload decision.
fn bench_message_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_size");

    let small = "x".repeat(1024);
    let large = "x".repeat(4 * 1024 * 1024);
    let mut attributes = Attributes::new();
    for i in 0..10 {
        attributes.insert(format!("attr_{i}"), MessageAttribute::string(format!("value_{i}")));
    }

    group.bench_function("1kb_no_attributes", |b| {
        let empty = Attributes::new();
        b.iter(|| black_box(message_size(black_box(&small), &empty)));
    });

    // Body length is O(1); attribute count dominates
    group.bench_function("4mb_10_attributes", |b| {
        b.iter(|| black_box(message_size(black_box(&large), &attributes)));
    });

    group.finish();
}

/// Benchmark the reference and receipt-handle codecs.
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let key = generate_key();
    let reference = encode_reference("test-bucket", &key);
    let handle = "AQEB".repeat(100);
    let wrapped = wrap_receipt_handle("test-bucket", &key, &handle);

    group.bench_function("generate_key", |b| b.iter(|| black_box(generate_key())));

    group.bench_function("decode_reference", |b| {
        b.iter(|| black_box(decode_reference(black_box(Some(reference.as_str())))))
    });

    group.bench_function("wrap_receipt_handle", |b| {
        b.iter(|| black_box(wrap_receipt_handle("test-bucket", &key, black_box(&handle))))
    });

    group.bench_function("unwrap_wrapped_handle", |b| {
        b.iter(|| black_box(unwrap_receipt_handle(black_box(&wrapped))))
    });

    group.bench_function("unwrap_plain_handle", |b| {
        b.iter(|| black_box(unwrap_receipt_handle(black_box(&handle))))
    });

    group.finish();
}

criterion_group!(benches, bench_message_size, bench_codec);
criterion_main!(benches);
