use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::path::PathBuf;
use suite_runner::config::OrderingConfig;
use suite_runner::models::TestCandidate;
use suite_runner::planner::plan_execution;

fn suite(size_per_group: usize) -> Vec<TestCandidate> {
    let mut candidates = Vec::new();
    for group in ["rbftest", "rmtest", "ixtest", "qetest"] {
        for i in (0..size_per_group).rev() {
            let path = PathBuf::from("/build").join(format!("{group}_{i:03}"));
            candidates.extend(TestCandidate::new(path));
        }
        for fixed in ["custom", "create_tables", "delete_tables"] {
            let path = PathBuf::from("/build").join(format!("{group}_{fixed}"));
            candidates.extend(TestCandidate::new(path));
        }
    }
    candidates
}

fn bench_plan_execution(c: &mut Criterion) {
    let config = OrderingConfig {
        unmatched: suite_runner::config::UnmatchedPolicy::Append,
        ..OrderingConfig::default()
    };
    let candidates = suite(250);

    c.bench_function("plan_execution_1000", |b| {
        b.iter(|| plan_execution(black_box(candidates.clone()), &config));
    });
}

criterion_group!(benches, bench_plan_execution);
criterion_main!(benches);
