//! Benchmarks for the insertion path and the blob codec.
//!
//! Simulates realistic container populations:
//! - small:  ~100 nodes   (config-style key/value data)
//! - medium: ~10k nodes   (working set of a session)
//! - large:  ~100k nodes  (bulk import)
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use motley::{Kind, List, Queue, Tag};

/// Container populations to benchmark
const SIZES: &[(&str, usize)] = &[("small", 100), ("medium", 10_000), ("large", 100_000)];

fn keyed_list(nodes: usize) -> List {
    let mut list = List::new(Tag::owned(Kind::Str));
    for position in 0..nodes {
        list.add_back(format!("key{}", position).as_str(), position as i64)
            .unwrap();
    }
    list
}

fn bench_add_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_back");
    for &(name, nodes) in SIZES {
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &nodes, |b, &nodes| {
            b.iter(|| black_box(keyed_list(nodes)));
        });
    }
    group.finish();
}

fn bench_queue_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_push");
    for &(name, nodes) in SIZES {
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &nodes, |b, &nodes| {
            b.iter(|| {
                let mut queue = Queue::new(Tag::owned(Kind::Str));
                for value in 0..nodes {
                    queue.push(value as i64);
                }
                black_box(queue)
            });
        });
    }
    group.finish();
}

fn bench_blob_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("blob");
    for &(name, nodes) in SIZES {
        let list = keyed_list(nodes);
        let blob = list.to_blob().unwrap();
        group.throughput(Throughput::Bytes(blob.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", name), &list, |b, list| {
            b.iter(|| black_box(list.to_blob().unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("decode", name), &blob, |b, blob| {
            b.iter(|| black_box(List::from_blob(blob).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add_back, bench_queue_push, bench_blob_round_trip);
criterion_main!(benches);
