use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly_sql::models::job;
use jobly_sql::{AttributeBag, NameMap, compile_filter, compile_partial_update};

/// A bag of `n` fields: field0 = 0, field1 = 1, ...
fn build_bag(n: i64) -> AttributeBag {
    (0..n).map(|i| (format!("field{i}"), i)).collect()
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_update/compile");

    for n in [1, 5, 10, 50, 100] {
        let bag = build_bag(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bag, |b, bag| {
            b.iter(|| black_box(compile_partial_update(bag, &NameMap::identity())));
        });
    }

    group.finish();
}

fn bench_job_filter(c: &mut Criterion) {
    let filters = AttributeBag::new()
        .with("minSalary", 50_000)
        .with("hasEquity", true)
        .with("title", "engineer");

    c.bench_function("filter/jobs", |b| {
        b.iter(|| black_box(compile_filter(&filters, &job::FILTERS)));
    });
}

criterion_group!(benches, bench_partial_update, bench_job_filter);
criterion_main!(benches);
