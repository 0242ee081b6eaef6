//! Benchmarks for the evolution engine.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use genetic_search::{compute::EvolutionEngine, domains::PhraseDomain, schema::EvolutionConfig};

fn bench_fixed_budget(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_budget");

    for population_size in [20, 40, 80, 160] {
        let config = EvolutionConfig {
            population_size,
            max_iterations: Some(200),
            acceptable_score: None,
            stagnation_limit: None,
            random_seed: Some(42),
        };
        let domain = PhraseDomain::new("Hello World").unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_organisms", population_size)),
            &population_size,
            |b, _| {
                b.iter(|| {
                    let mut engine = EvolutionEngine::new(config.clone(), &domain).unwrap();
                    black_box(engine.run().unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_convergence(c: &mut Criterion) {
    let mut group = c.benchmark_group("convergence");

    for target in ["Hello", "Hello World", "The quick brown fox"] {
        let config = EvolutionConfig {
            population_size: 20,
            max_iterations: Some(50_000),
            acceptable_score: Some(0.0),
            stagnation_limit: None,
            random_seed: Some(7),
        };
        let domain = PhraseDomain::new(target).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, _| {
            b.iter(|| {
                let mut engine = EvolutionEngine::new(config.clone(), &domain).unwrap();
                black_box(engine.run().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fixed_budget, bench_convergence);
criterion_main!(benches);
