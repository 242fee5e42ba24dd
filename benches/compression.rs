mod common;

use common::generate_corpus;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use odz::compress_bytes;
use std::hint::black_box;
use std::time::Duration;

fn compression_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_throughput");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    // Size ladder aligned to the codec's boundaries: well under a block,
    // around the match window, and exactly one block.
    for size in [4096usize, 65536, 1048576].iter() {
        let size_label = match *size {
            4096 => "4KB",
            65536 => "64KB",
            1048576 => "1MB",
            _ => "unknown",
        };

        for shape in ["logs", "window", "runs", "noise"].iter() {
            let data = generate_corpus(*size, shape);

            for level in [1u8, 6, 9].iter() {
                let benchmark_id = BenchmarkId::from_parameter(format!(
                    "{}/{}/level{}",
                    size_label, shape, level
                ));

                group.throughput(Throughput::Bytes(*size as u64));
                group.bench_with_input(benchmark_id, &data, |b, data| {
                    b.iter(|| {
                        compress_bytes(black_box(data), black_box(*level))
                            .expect("Compression failed")
                    });
                });
            }
        }
    }

    group.finish();
}

fn compression_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_ratio");
    group.measurement_time(Duration::from_secs(5));

    for size in [65536usize, 262144] {
        for shape in ["logs", "window", "runs", "noise"].iter() {
            let data = generate_corpus(size, shape);

            let benchmark_id = BenchmarkId::from_parameter(format!("{}/{}", size, shape));

            group.bench_with_input(benchmark_id, &data, |b, data| {
                b.iter(|| {
                    let compressed =
                        compress_bytes(black_box(data), black_box(9)).expect("Compression failed");
                    let ratio = compressed.len() as f64 / data.len() as f64;
                    black_box(ratio)
                });
            });
        }
    }

    group.finish();
}

fn multi_block_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_block_compression");
    group.measurement_time(Duration::from_secs(20));
    group.sample_size(10);

    // Inputs spanning several 1 MiB blocks
    for size in [4194304usize, 16777216].iter() {
        let size_label = match *size {
            4194304 => "4MB",
            16777216 => "16MB",
            _ => "unknown",
        };

        let data = generate_corpus(*size, "logs");

        let benchmark_id = BenchmarkId::from_parameter(size_label);

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(benchmark_id, &data, |b, data| {
            b.iter(|| compress_bytes(black_box(data), black_box(6)).expect("Compression failed"));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    compression_throughput,
    compression_ratio,
    multi_block_compression
);
criterion_main!(benches);
