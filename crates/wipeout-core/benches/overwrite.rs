//! Benchmarks for overwrite throughput.
//!
//! Measures the pass loop against an in-memory sink (pattern generation
//! cost) and full file destruction on disk (including sync).

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use std::fs;
use std::hint::black_box;
use tempfile::TempDir;
use wipeout_core::CancelToken;
use wipeout_core::OverwriteEngine;
use wipeout_core::PassCount;
use wipeout_core::ShredConfig;
use wipeout_core::engine::overwrite_passes;
use wipeout_core::io::RecordingSink;
use wipeout_core::pattern::PassSpec;
use wipeout_core::pattern::Pattern;

fn bench_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_pass");
    let size: u64 = 4 * 1024 * 1024;
    group.throughput(Throughput::Bytes(size));

    for pattern in [Pattern::Zeros, Pattern::Random] {
        let spec = PassSpec::from_patterns(vec![pattern]).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(pattern.label()),
            &spec,
            |b, spec| {
                let mut sink = RecordingSink::new(vec![0; size as usize]);
                b.iter(|| {
                    overwrite_passes(&mut sink, size, spec, &CancelToken::new(), |_, _| {})
                        .unwrap();
                    black_box(sink.contents().len());
                });
            },
        );
    }
    group.finish();
}

fn bench_destroy(c: &mut Criterion) {
    let mut group = c.benchmark_group("destroy_file");
    group.sample_size(10);

    for size in [64 * 1024usize, 1024 * 1024] {
        let config = ShredConfig::default().with_passes(PassCount::QUICK);
        let spec = config.pass_spec();
        let engine = OverwriteEngine::new(&config);
        group.throughput(Throughput::Bytes((size * 3) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let temp = TempDir::new().unwrap();
            let payload = vec![0x42u8; size];
            b.iter(|| {
                let path = temp.path().join("victim");
                fs::write(&path, &payload).unwrap();
                black_box(engine.destroy(&path, &spec));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_patterns, bench_destroy);
criterion_main!(benches);
