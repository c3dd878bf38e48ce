use criterion::{black_box, criterion_group, criterion_main, Criterion};
use farm_core::FarmConfig;
use std::time::Instant;

fn bench_year(c: &mut Criterion) {
    let cfg = FarmConfig {
        plot_count: 36,
        initial_cash: 1_000,
        ..FarmConfig::default()
    };
    c.bench_function("farm 36 plots x 365 days", |b| {
        b.iter(|| {
            let now = Instant::now();
            let mut session = farm_runtime::Session::new(cfg.clone(), now).unwrap();
            let reports = session.run_days(365, now);
            black_box(reports.len())
        })
    });
}

criterion_group!(benches, bench_year);
criterion_main!(benches);
