//! Benchmarks for sample buffer operations
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sensor_collector::{export, Axis, Sample, SampleRingBuffer};

fn sample(i: i64) -> Sample {
    let t = i as f32 * 0.01;
    Sample::new(i * 5_000_000, t.sin(), t.cos(), 0.5 * t.sin())
}

fn filled(capacity: usize) -> SampleRingBuffer {
    let buffer = SampleRingBuffer::new(capacity).unwrap();
    for i in 0..capacity as i64 {
        buffer.write(sample(i));
    }
    buffer
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    // Each write rebuilds the window, so cost scales with capacity
    for capacity in [100, 400, 2000].iter() {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("at_capacity", capacity),
            capacity,
            |b, &capacity| {
                let buffer = filled(capacity);
                let mut i = capacity as i64;
                b.iter(|| {
                    buffer.write(black_box(sample(i)));
                    i = i.wrapping_add(1);
                });
            },
        );
    }

    group.finish();
}

fn bench_write_with_subscriber(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_with_subscriber");

    let buffer = filled(400);
    let sub = buffer.subscribe();
    let mut i = 400i64;

    group.bench_function("publish_and_drain", |b| {
        b.iter(|| {
            buffer.write(black_box(sample(i)));
            i = i.wrapping_add(1);
            black_box(sub.latest_window())
        });
    });

    group.finish();
}

fn bench_recording(c: &mut Criterion) {
    let mut group = c.benchmark_group("recording");

    let buffer = filled(400);
    buffer.start_recording();
    let mut i = 400i64;

    group.bench_function("write_while_recording", |b| {
        b.iter(|| {
            buffer.write(black_box(sample(i)));
            i = i.wrapping_add(1);
            // Keep the log from growing without bound across iterations
            if i % 100_000 == 0 {
                buffer.start_recording();
            }
        });
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for capacity in [400, 2000].iter() {
        let buffer = filled(*capacity);
        group.bench_with_input(BenchmarkId::new("window", capacity), &buffer, |b, buffer| {
            b.iter(|| black_box(buffer.snapshot()));
        });
        group.bench_with_input(
            BenchmarkId::new("plot_points", capacity),
            &buffer,
            |b, buffer| {
                b.iter(|| black_box(buffer.snapshot().plot_points(Axis::X)));
            },
        );
    }

    group.finish();
}

fn bench_csv_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_export");

    for size in [1000, 10_000].iter() {
        let samples: Vec<Sample> = (0..*size as i64).map(sample).collect();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("write", size), &samples, |b, samples| {
            b.iter(|| {
                let mut out = Vec::with_capacity(samples.len() * 40);
                export::write_samples(&mut out, samples, export::ExportFormat::Csv).unwrap();
                black_box(out)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_write,
    bench_write_with_subscriber,
    bench_recording,
    bench_snapshot,
    bench_csv_export,
);

criterion_main!(benches);
