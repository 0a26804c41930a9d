//! Benchmarks for PELT changepoint detection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pelt_changepoint::changepoint::{
    pelt_detect, solve, CostKind, CostModel, NormalMeanCost, PeltConfig, PeltSolver,
};

/// Blocks of `block` samples alternating between two levels, with a
/// deterministic wobble standing in for noise.
fn generate_steps(n: usize, block: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let level = if (i / block) % 2 == 0 { 0.0 } else { 5.0 };
            level + ((i * 31 + 7) % 13) as f64 * 0.1 - 0.6
        })
        .collect()
}

fn bench_solve_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("pelt_solve_scaling");

    for size in [1_000, 5_000, 20_000].iter() {
        let signal = generate_steps(*size, 250);

        group.bench_with_input(BenchmarkId::new("solve", size), size, |b, _| {
            b.iter(|| solve(black_box(&signal), None))
        });

        let model = NormalMeanCost::new(&signal, Some(1.0)).unwrap();
        let solver = PeltSolver::new(PeltConfig::default().penalty(20.0)).unwrap();
        group.bench_with_input(BenchmarkId::new("prebuilt_model", size), size, |b, _| {
            b.iter(|| solver.solve(black_box(&model)))
        });
    }

    group.finish();
}

fn bench_cost_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("pelt_cost_models");

    // Shift positive so every model accepts the input.
    let signal: Vec<f64> = generate_steps(4_000, 200).iter().map(|x| x + 2.0).collect();

    for kind in [
        CostKind::NormalMean,
        CostKind::NormalVar,
        CostKind::NormalMeanVar,
        CostKind::Poisson,
        CostKind::Exponential,
    ] {
        let name = format!("{kind:?}");

        group.bench_function(BenchmarkId::new("build", &name), |b| {
            b.iter(|| CostModel::build(kind, black_box(&signal)))
        });

        let config = PeltConfig::default().cost_function(kind).penalty(25.0);
        group.bench_function(BenchmarkId::new("detect", &name), |b| {
            b.iter(|| pelt_detect(black_box(&signal), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve_scaling, bench_cost_models);
criterion_main!(benches);
