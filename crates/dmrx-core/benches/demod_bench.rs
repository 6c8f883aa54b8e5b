//! Benchmarks for the DQPSK receiver hot paths
//!
//! Run with: cargo bench -p dmrx-core --bench demod_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use dmrx_core::demodulator::{differential_phases, DqpskDemodulator};
use dmrx_core::interpolator;
use dmrx_core::prelude::*;
use dmrx_core::symbol_processor::SymbolProcessor;

fn bench_interpolator(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolator");
    let samples: Vec<f32> = (0..64).map(|x| (x as f32 * 0.3).sin()).collect();

    group.bench_function("filter", |b| {
        b.iter(|| interpolator::filter(black_box(&samples), black_box(17), black_box(0.375)))
    });
    group.bench_function("filter_scalar", |b| {
        b.iter(|| interpolator::filter_scalar(black_box(&samples), black_box(17), black_box(0.375)))
    });
    group.bench_function("filter_lanes", |b| {
        b.iter(|| interpolator::filter_lanes(black_box(&samples), black_box(17), black_box(0.375)))
    });
    group.finish();
}

fn bench_differential(c: &mut Criterion) {
    let mut group = c.benchmark_group("differential");
    let n = 4096;
    let i: Vec<f32> = (0..n + 32).map(|x| (x as f64 * 0.075).cos() as f32).collect();
    let q: Vec<f32> = (0..n + 32).map(|x| (x as f64 * 0.075).sin() as f32).collect();
    let mut out = vec![0.0f32; n];

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("block_4096", |b| {
        b.iter(|| {
            differential_phases(
                black_box(&i),
                black_box(&q),
                black_box(6),
                black_box(0.4167),
                black_box(&mut out),
            )
        })
    });
    group.finish();
}

fn bench_symbol_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("symbol_processor");
    let n = 4096;
    let phases: Vec<f32> = (0..n)
        .map(|x| ((x as f32 * 0.096).sin() * 2.0).clamp(-2.4, 2.4))
        .collect();

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("process_4096", |b| {
        let mut processor = SymbolProcessor::new(&DemodConfig::default());
        b.iter(|| {
            processor.process(black_box(&phases));
            processor.take_symbols()
        })
    });
    group.finish();
}

fn bench_receive(c: &mut Criterion) {
    let mut group = c.benchmark_group("demodulator");
    let n = 4096;
    let w = 0.075f64;
    let batch = ComplexSamples::new(
        (0..n).map(|x| (w * x as f64).cos() as f32).collect(),
        (0..n).map(|x| (w * x as f64).sin() as f32).collect(),
        0,
    )
    .unwrap();

    group.throughput(Throughput::Elements(n as u64));
    group.bench_function("receive_4096", |b| {
        let mut demod = DqpskDemodulator::new(DemodConfig::default()).unwrap();
        b.iter(|| demod.receive(black_box(&batch)).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_interpolator,
    bench_differential,
    bench_symbol_processor,
    bench_receive
);
criterion_main!(benches);
