//! Benchmarks for trace generation.
//!
//! Measures the cost of producing a full event trace for each algorithm at
//! the sequence sizes the visualizer allows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sortvis_kernels::{AlgorithmKind, Value, MAX_SEQUENCE_LEN};

/// Deterministic pseudo-random fill (LCG).
fn sequence(len: usize) -> Vec<Value> {
    let mut state: u32 = 42;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            Value::from(state % 290) + 10
        })
        .collect()
}

fn bench_trace(c: &mut Criterion) {
    for kind in AlgorithmKind::ALL {
        let mut group = c.benchmark_group(format!("trace/{}", kind.id()));
        for &len in &[10usize, 100, MAX_SEQUENCE_LEN] {
            let input = sequence(len);
            group.throughput(Throughput::Elements(len as u64));
            group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
                b.iter(|| kind.trace(black_box(input)))
            });
        }
        group.finish();
    }
}

fn bench_replay(c: &mut Criterion) {
    let input = sequence(MAX_SEQUENCE_LEN);
    let mut group = c.benchmark_group("replay");
    for kind in AlgorithmKind::ALL {
        let Ok(trace) = kind.trace(&input) else {
            continue;
        };
        group.throughput(Throughput::Elements(trace.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(kind.id()), &trace, |b, trace| {
            b.iter(|| trace.replay(black_box(&input)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_trace, bench_replay);
criterion_main!(benches);
