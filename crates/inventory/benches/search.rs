use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, Local, TimeZone};
use stocktrack_core::ItemId;
use stocktrack_inventory::{Item, MonthOfYear, filter_items, stock_value};

fn build_items(count: usize) -> Vec<Item> {
    let base = Local.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| Item {
            id: ItemId::from_raw(i as i64 + 1),
            name: format!("Item {i:05}"),
            price: (i % 500) as f64 + 0.99,
            quantity: (i % 40) as i64,
            date_added: base,
            date_updated: base,
            date_expire: base + Duration::days((i % 365) as i64),
        })
        .collect()
}

fn bench_search_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_scan");

    for count in [10, 100, 1000, 10000].iter() {
        let items = build_items(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("name_query", count), &items, |b, items| {
            b.iter(|| filter_items(black_box(items), black_box("item 00")));
        });

        group.bench_with_input(BenchmarkId::new("date_query", count), &items, |b, items| {
            b.iter(|| filter_items(black_box(items), black_box("07/")));
        });
    }

    group.finish();
}

fn bench_month_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("month_value");
    let period = MonthOfYear::new(7, 2026).unwrap();

    for count in [100, 10000].iter() {
        let items = build_items(*count);
        group.bench_with_input(BenchmarkId::new("sum", count), &items, |b, items| {
            b.iter(|| stock_value(black_box(items), |i| period.contains(&i.date_expire)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search_scan, bench_month_value);
criterion_main!(benches);
