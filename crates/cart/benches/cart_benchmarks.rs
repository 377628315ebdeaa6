use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use storefront_cart::Cart;
use storefront_catalog::Product;
use storefront_core::Money;

fn products(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| Product::new(format!("p-{i}"), format!("Product {i}"), Money::new(100 + i as u64), 1_000, "f1"))
        .collect()
}

/// Adds with a high share of merges into existing lines.
fn bench_add_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart_add");
    for &distinct in &[10usize, 100, 500] {
        let catalog = products(distinct);
        group.throughput(Throughput::Elements((distinct * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(distinct), &catalog, |b, catalog| {
            b.iter(|| {
                let mut cart = Cart::new();
                for round in 0..4 {
                    for product in catalog {
                        cart.add(product, black_box(round + 1));
                    }
                }
                black_box(cart.total())
            })
        });
    }
    group.finish();
}

/// Derived reads are recomputed on every call; measure what a render pass costs.
fn bench_derived_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("cart_derived");
    for &lines in &[10usize, 100, 500] {
        let mut cart = Cart::new();
        for product in products(lines) {
            cart.add(&product, 2);
        }
        group.bench_with_input(BenchmarkId::from_parameter(lines), &cart, |b, cart| {
            b.iter(|| black_box((cart.item_count(), cart.total(), cart.to_order_lines().len())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add_merge, bench_derived_reads);
criterion_main!(benches);
