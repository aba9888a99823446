use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use woot_core::crdt::woot::{IdentifierGenerator, Operation, PendingBuffer, Sequence};
use woot_core::protocol;

fn typed(site: i64, len: usize) -> (Sequence, Vec<Operation>) {
    let mut seq = Sequence::new(IdentifierGenerator::new(site));
    let ops = (0..len)
        .map(|i| seq.generate_insert("a", i).unwrap())
        .collect();
    (seq, ops)
}

/// Benchmark sequential typing (simulates real user typing)
fn bench_sequential_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("woot_sequential_typing");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(typed(1, size)));
        });
    }

    group.finish();
}

/// Benchmark remote integration of another site's typing
fn bench_remote_integration(c: &mut Criterion) {
    let (_, ops) = typed(1, 1000);

    c.bench_function("woot_integrate_remote_1k", |b| {
        b.iter_batched(
            || Sequence::new(IdentifierGenerator::new(2)),
            |mut seq| {
                for op in ops.iter().cloned() {
                    seq.integrate(op).unwrap();
                }
                black_box(seq.len())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark the paste / delete all / paste again pattern
///
/// The second paste lands behind a run of tombstones, which is the worst
/// case for gap narrowing.
fn bench_tombstone_reinsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("woot_tombstone_reinsert");
    group.sample_size(10);

    for size in [100, 500].iter() {
        let (mut origin, mut ops) = typed(1, *size);
        for _ in 0..*size {
            ops.push(origin.generate_delete(0).unwrap());
        }
        for i in 0..*size {
            ops.push(origin.generate_insert("b", i).unwrap());
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &ops, |b, ops| {
            b.iter_batched(
                || Sequence::new(IdentifierGenerator::new(2)),
                |mut seq| {
                    for op in ops.iter().cloned() {
                        seq.integrate(op).unwrap();
                    }
                    black_box(seq.visible_text())
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark draining a batch delivered in reverse causal order
fn bench_reverse_delivery(c: &mut Criterion) {
    let (_, mut ops) = typed(1, 200);
    ops.reverse();

    c.bench_function("woot_pending_drain_reverse_200", |b| {
        b.iter_batched(
            || (Sequence::new(IdentifierGenerator::new(2)), PendingBuffer::new()),
            |(mut seq, mut buffer)| black_box(buffer.submit_batch(ops.iter().cloned(), &mut seq)),
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark wire decoding of a 1k batch
fn bench_decode_batch(c: &mut Criterion) {
    let (_, ops) = typed(1, 1000);
    let payload = protocol::encode_batch(&ops).unwrap();

    c.bench_function("woot_decode_batch_1k", |b| {
        b.iter(|| black_box(protocol::decode_batch(&payload).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_sequential_typing,
    bench_remote_integration,
    bench_tombstone_reinsert,
    bench_reverse_delivery,
    bench_decode_batch
);
criterion_main!(benches);
