use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform};
use std::hint::black_box;
use wagefit::{
    data::{Dataset, WageRecord},
    pipeline::{self, AnalysisConfig},
};

/// Wage-like data: a concave experience profile plus noise, over experience in `[-2, 59]`.
fn gen_sample_data(n: usize) -> Vec<(f64, f64)> {
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    let experience = Uniform::new_inclusive(-2.0, 59.0).expect("valid range");
    let noise = Normal::new(0.0, 150.0).expect("valid distribution");

    let mut data: Vec<(f64, f64)> = (0..n.saturating_sub(2))
        .map(|_| {
            let x: f64 = experience.sample(&mut rng);
            let y = 350.0 + 30.0 * x - 0.5 * x * x + noise.sample(&mut rng);
            (x, y.max(rng.random_range(50.0..100.0)))
        })
        .collect();

    // Pin the boundary so every knot set is inside the range
    data.push((-2.0, 300.0));
    data.push((59.0, 500.0));
    data
}

fn criterion_benchmark(c: &mut Criterion) {
    let config = AnalysisConfig::default();

    //
    // Every variant at a fixed size
    println!("Benchmarking fit vs model (n=1000)...");
    let samples = gen_sample_data(1_000);
    let x_range = -2.0..=59.0;
    let mut group = c.benchmark_group("fit_vs_model");
    for spec in &config.variants {
        group.bench_with_input(BenchmarkId::from_parameter(spec.label()), spec, |b, spec| {
            b.iter(|| {
                pipeline::fit_variant(spec, black_box(&samples), &x_range, config.grid_size)
                    .expect("Failed to fit data")
            });
        });
    }
    group.finish();

    //
    // How the spline fit scales with data size
    println!("Benchmarking fit vs n (Spline(knots=[15,30,45]))...");
    let spline = config.variants[config.variants.len() - 1].clone();
    let mut group = c.benchmark_group("fit_vs_n");
    for n in [100, 1_000, 10_000, 100_000] {
        let samples = gen_sample_data(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &samples, |b, samples| {
            b.iter(|| {
                pipeline::fit_variant(&spline, black_box(samples), &x_range, config.grid_size)
                    .expect("Failed to fit data")
            });
        });
    }
    group.finish();

    //
    // The whole comparison, filtering included
    println!("Benchmarking full analysis...");
    let mut group = c.benchmark_group("analysis");
    for n in [1_000, 10_000] {
        let dataset: Dataset = gen_sample_data(n)
            .into_iter()
            .map(|(e, w)| WageRecord::new(e, w))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, dataset| {
            b.iter(|| pipeline::run(black_box(dataset.clone()), &config).expect("Failed to run"));
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
