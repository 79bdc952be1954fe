/// Aggregation Benchmarks
///
/// Measures predicate flattening over generated sessions and log line
/// scanning throughput.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use querystat::log_scan::LogScanner;
use querystat::predicate::{Leaf, Predicate};
use querystat::stats::AttributeStats;
use serde_json::json;

/// Balanced AND/OR tree with `2^height` leaves
fn balanced_tree(height: u32, next: &mut usize) -> Predicate {
    if height == 0 {
        *next += 1;
        let path = format!("/level{}/attr{}", *next % 7, *next % 31);
        return Predicate::Leaf(Leaf::new("IntEqualityPredicate", json!({ "Path": path })).unwrap());
    }
    let lhs = balanced_tree(height - 1, next);
    let rhs = balanced_tree(height - 1, next);
    if height % 2 == 0 {
        Predicate::and(lhs, rhs)
    } else {
        Predicate::or(lhs, rhs)
    }
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for height in [4u32, 8, 12] {
        let mut next = 0;
        let tree = balanced_tree(height, &mut next);
        group.throughput(Throughput::Elements(1 << height));
        group.bench_with_input(BenchmarkId::from_parameter(height), &tree, |b, tree| {
            b.iter(|| {
                let mut stats = AttributeStats::new();
                for leaf in black_box(tree).leaves() {
                    stats.record_leaf(leaf.kind(), leaf.path());
                }
                black_box(stats.total_count)
            });
        });
    }

    group.finish();
}

fn bench_scan_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_lines");
    let scanner = LogScanner::default();
    let lines: Vec<String> = (0..1000)
        .map(|i| format!("LOAD twitter CHOOSE '/user/{}' == 1 && EXISTS('/id/{}')", i % 13, i % 5))
        .collect();

    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("1000_lines", |b| {
        b.iter(|| {
            let mut stats = AttributeStats::new();
            for line in &lines {
                scanner.scan_line(&mut stats, black_box(line));
            }
            black_box(stats.total_count)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_scan_lines);
criterion_main!(benches);
