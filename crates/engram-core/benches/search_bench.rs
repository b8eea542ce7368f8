//! Engram Core Benchmarks
//!
//! Benchmarks for the hot paths exercised on every store/search call.
//! Run with: cargo bench -p engram-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use engram_core::decay::{calculate_decay, reinforce};
use engram_core::embedding::{EmbeddingBackend, LocalHashEmbedding};
use engram_core::sector::{classify, sector_penalty, Sector};
use engram_core::waypoint::WaypointGraph;

fn bench_classify(c: &mut Criterion) {
    let texts = [
        "Yesterday I went to the store and bought groceries",
        "Python is a programming language used for scripting",
        "How to install Python: first download the installer",
        "I feel so happy and excited today!",
        "I realized that the pattern connects everything I've learned",
    ];

    c.bench_function("sector_classify", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(classify(text, None));
            }
        })
    });
}

fn bench_sector_penalty(c: &mut Criterion) {
    c.bench_function("sector_penalty_all_pairs", |b| {
        b.iter(|| {
            for &q in &Sector::ALL {
                for &m in &Sector::ALL {
                    black_box(sector_penalty(q, m));
                }
            }
        })
    });
}

fn bench_decay(c: &mut Criterion) {
    c.bench_function("calculate_decay", |b| {
        b.iter(|| {
            black_box(calculate_decay(0.8, 0.02, 12.5));
        })
    });
}

fn bench_reinforce(c: &mut Criterion) {
    c.bench_function("reinforce_10_steps", |b| {
        b.iter(|| {
            let mut salience = 0.5;
            for _ in 0..10 {
                salience = reinforce(salience, 0.15);
            }
            black_box(salience);
        })
    });
}

fn bench_waypoint_expand(c: &mut Criterion) {
    let mut graph = WaypointGraph::new();
    for i in 0..200 {
        let src = format!("m{i}");
        let dst = format!("m{}", (i + 1) % 200);
        graph.create(&src, &dst, Some(0.8), false, 0).unwrap();
    }

    c.bench_function("waypoint_expand_200_nodes", |b| {
        b.iter(|| {
            black_box(graph.expand(&["m0".to_string()], 20, 0.1));
        })
    });
}

fn bench_local_embedding_search(c: &mut Criterion) {
    let mut backend = LocalHashEmbedding::new();
    let chunks: Vec<String> = (0..500)
        .map(|i| format!("[ID:m{i}][SEC:semantic] memory number {i} about various topics and facts"))
        .collect();
    backend.rebuild(&chunks).unwrap();

    c.bench_function("local_hash_embedding_search_500", |b| {
        b.iter(|| {
            black_box(backend.search("memory about facts and topics", 10).unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_sector_penalty,
    bench_decay,
    bench_reinforce,
    bench_waypoint_expand,
    bench_local_embedding_search,
);
criterion_main!(benches);
