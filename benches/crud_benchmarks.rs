use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;

use cow_btree::CowBTreeMap;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insertion ──────────────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_ordered");

    group.bench_function(BenchmarkId::new("CowBTreeMap", N), |b| {
        b.iter(|| {
            let mut map = CowBTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    let keys = random_keys(N);

    group.bench_function(BenchmarkId::new("CowBTreeMap", N), |b| {
        b.iter(|| {
            let mut map = CowBTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

// ─── Lookup and iteration ───────────────────────────────────────────────────

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    let keys = random_keys(N);
    let std: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let cow = CowBTreeMap::from_sorted_iter(std.clone()).unwrap();

    group.bench_function(BenchmarkId::new("CowBTreeMap", N), |b| {
        b.iter(|| keys.iter().filter_map(|k| cow.get(k)).sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| keys.iter().filter_map(|k| std.get(k)).sum::<i64>());
    });

    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");
    let cow = CowBTreeMap::from_sorted_iter((0..N as i64).map(|k| (k, k))).unwrap();
    let std: BTreeMap<i64, i64> = (0..N as i64).map(|k| (k, k)).collect();

    group.bench_function(BenchmarkId::new("CowBTreeMap", N), |b| {
        b.iter(|| cow.values().sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| std.values().sum::<i64>());
    });

    group.finish();
}

// ─── Order statistics ───────────────────────────────────────────────────────

fn bench_rank_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_ops");
    let map = CowBTreeMap::from_sorted_iter((0..N as i64).map(|k| (k, k))).unwrap();

    group.bench_function(BenchmarkId::new("get_by_rank", N), |b| {
        b.iter(|| {
            (0..map.len())
                .step_by(7)
                .filter_map(|r| map.get_by_rank(r))
                .map(|(_, &v)| v)
                .sum::<i64>()
        });
    });

    group.bench_function(BenchmarkId::new("rank_of", N), |b| {
        b.iter(|| (0..N as i64).step_by(7).filter_map(|k| map.rank_of(&k)).sum::<usize>());
    });

    group.finish();
}

// ─── Value semantics ────────────────────────────────────────────────────────

fn bench_clone_and_diverge(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone_and_diverge");
    let map = CowBTreeMap::from_sorted_iter((0..N as i64).map(|k| (k, k))).unwrap();

    // O(1) handle clone.
    group.bench_function(BenchmarkId::new("clone", N), |b| {
        b.iter(|| map.clone());
    });

    // Clone plus one write: the cost of un-sharing a single root-to-leaf path.
    group.bench_function(BenchmarkId::new("clone_then_insert", N), |b| {
        b.iter(|| {
            let mut fork = map.clone();
            fork.insert(-1, -1);
            fork
        });
    });

    group.finish();
}

// ─── Bulk append ────────────────────────────────────────────────────────────

fn bench_bulk_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_append");
    let keys = ordered_keys(N);

    group.bench_function(BenchmarkId::new("extend_from_sorted", N), |b| {
        b.iter(|| {
            let mut map = CowBTreeMap::new();
            map.extend_from_sorted(keys.iter().map(|&k| (k, k))).unwrap();
            map
        });
    });

    group.bench_function(BenchmarkId::new("insert_loop", N), |b| {
        b.iter(|| {
            let mut map = CowBTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_random,
    bench_get,
    bench_iterate,
    bench_rank_ops,
    bench_clone_and_diverge,
    bench_bulk_append,
);
criterion_main!(benches);
