//! Benchmarks do otimizador de slate.
//!
//! Testa performance de:
//! - Construção de sessão (relevância + matriz de interferência)
//! - Re-otimização a cada movimento de slider (N≈30, K≈5)
//! - Re-otimização em pools maiores
//!
//! Executar: `cargo bench --bench slate_bench`

use born_slate::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

fn generate_pool(count: usize, dim: usize) -> Vec<CandidateItem> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let vector = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
            CandidateItem::new(format!("item-{}", i), vector)
        })
        .collect()
}

fn generate_query(dim: usize) -> QueryRepresentation {
    let mut rng = rand::thread_rng();
    QueryRepresentation::single((0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Construção de Sessão
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_session_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_build");
    group.sample_size(30);

    let dim = 768;
    let query = generate_query(dim);

    for count in [30, 100, 500].iter() {
        let pool = generate_pool(*count, dim);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), count, |bencher, _| {
            let config = OptimizerConfig::default().with_parallel_threshold(usize::MAX);
            bencher.iter(|| {
                black_box(ReoptimizationController::new(&query, pool.clone(), config.clone()))
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", count), count, |bencher, _| {
            let config = OptimizerConfig::default().with_parallel_threshold(1);
            bencher.iter(|| {
                black_box(ReoptimizationController::new(&query, pool.clone(), config.clone()))
            })
        });
    }

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Re-otimização (slider)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_reoptimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("reoptimize");

    let dim = 768;
    let query = generate_query(dim);

    for (count, k) in [(30, 5), (200, 10), (1000, 20)].iter() {
        let controller = ReoptimizationController::new(
            &query,
            generate_pool(*count, dim),
            OptimizerConfig::default().with_slate_size(*k),
        )
        .expect("valid session");

        group.bench_with_input(
            BenchmarkId::new(format!("k{}", k), count),
            count,
            |bencher, _| {
                let mut gamma = 0.0f32;
                bencher.iter(|| {
                    // Simula o slider percorrendo [0, 2)
                    gamma = (gamma + 0.05) % 2.0;
                    black_box(controller.reoptimize(Weights::new(gamma, 0.0)))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_session_build, bench_reoptimize);

criterion_main!(benches);
