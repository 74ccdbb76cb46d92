//! R-tree 性能基准测试
//!
//! 数据规模：20,000 个随机小矩形，坐标范围 [0, 1000)

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatidx::csvio::{load_csv, write_results};
use spatidx::{RTree, Rectangle, StoredItem};

const BENCHMARK_SIZE: usize = 20_000;

/// 性能测试配置
struct BenchConfig {
    size: usize,
    min_entries: usize,
    max_entries: usize,
    seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: BENCHMARK_SIZE,
            min_entries: 4,
            max_entries: 16,
            seed: 42,
        }
    }
}

/// 生成测试数据
fn generate_test_data(count: usize, seed: u64) -> Vec<StoredItem> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let x = rng.gen_range(0.0..1000.0);
            let y = rng.gen_range(0.0..1000.0);
            let population = rng.gen_range(0..10_000_000);
            StoredItem::new(i as i32, format!("region-{}", i), population, Rectangle::new(x, y, x + 1.0, y + 1.0))
        })
        .collect()
}

/// 生成查询矩形
fn generate_query_rects(count: usize, coverage_percent: f64, seed: u64) -> Vec<Rectangle> {
    let mut rng = StdRng::seed_from_u64(seed + 1000);

    // 根据覆盖率计算查询矩形的大小
    let query_size = 1000.0 * (coverage_percent / 100.0).sqrt();

    (0..count)
        .map(|_| {
            let x = rng.gen_range(0.0..(1000.0 - query_size));
            let y = rng.gen_range(0.0..(1000.0 - query_size));
            Rectangle::new(x, y, x + query_size, y + query_size)
        })
        .collect()
}

fn build_tree(config: &BenchConfig, data: &[StoredItem]) -> RTree {
    let mut rtree = RTree::new(config.min_entries, config.max_entries);
    for item in data {
        rtree.insert(item.clone());
    }
    rtree
}

/// 插入性能测试
fn bench_insert(c: &mut Criterion) {
    let config = BenchConfig::default();
    let test_data = generate_test_data(config.size, config.seed);

    c.bench_function("insert", |b| {
        b.iter_batched(
            || test_data.clone(),
            |items| {
                let mut rtree = RTree::new(config.min_entries, config.max_entries);
                for item in items {
                    rtree.insert(item);
                }
                rtree
            },
            BatchSize::LargeInput,
        );
    });
}

/// 单条目查询性能测试
fn bench_search_item(c: &mut Criterion) {
    let config = BenchConfig::default();
    let test_data = generate_test_data(config.size, config.seed);
    let rtree = build_tree(&config, &test_data);

    c.bench_function("search_item", |b| {
        b.iter(|| {
            test_data
                .iter()
                .map(|item| rtree.search(&item.bounds).len())
                .sum::<usize>()
        });
    });
}

/// 区域查询性能测试
fn bench_search_area(c: &mut Criterion) {
    let config = BenchConfig::default();
    let test_data = generate_test_data(config.size, config.seed);
    let rtree = build_tree(&config, &test_data);

    for (name, coverage) in [("search_1%", 1.0), ("search_5%", 5.0), ("search_10%", 10.0)] {
        let queries = generate_query_rects(1_000, coverage, config.seed);

        c.bench_function(name, |b| {
            b.iter(|| queries.iter().map(|query| rtree.search(query).len()).sum::<usize>());
        });
    }
}

/// 带人口阈值的查询性能测试
fn bench_search_with_population(c: &mut Criterion) {
    let config = BenchConfig::default();
    let test_data = generate_test_data(config.size, config.seed);
    let rtree = build_tree(&config, &test_data);
    let queries = generate_query_rects(1_000, 5.0, config.seed);

    for (name, threshold) in [("population_0", 0), ("population_5m", 5_000_000)] {
        c.bench_function(name, |b| {
            b.iter(|| {
                queries
                    .iter()
                    .map(|query| rtree.search_with_population(query, threshold).len())
                    .sum::<usize>()
            });
        });
    }
}

/// CSV 加载性能测试
fn bench_load_csv(c: &mut Criterion) {
    let config = BenchConfig::default();
    let test_data = generate_test_data(config.size, config.seed);
    let refs: Vec<&StoredItem> = test_data.iter().collect();

    let mut csv_bytes = Vec::new();
    write_results(&mut csv_bytes, &refs).expect("failed to render CSV");

    c.bench_function("load_csv", |b| {
        b.iter(|| {
            let mut rtree = RTree::new(config.min_entries, config.max_entries);
            load_csv(csv_bytes.as_slice(), &mut rtree).expect("failed to load CSV");
            rtree
        });
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_search_item,
    bench_search_area,
    bench_search_with_population,
    bench_load_csv
);
criterion_main!(benches);
