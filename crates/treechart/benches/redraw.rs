use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use treechart::{ChartOptions, Dataset, HeadlessOverlay, HeadlessSvgSurface, Size, TreeChart};

fn org_chart(depth: usize, fanout: usize, prefix: &str) -> Value {
    if depth == 0 {
        return json!({ "name": prefix });
    }
    let children: Vec<Value> = (0..fanout)
        .map(|i| org_chart(depth - 1, fanout, &format!("{prefix}.{i}")))
        .collect();
    json!({ "name": prefix, "children": children })
}

fn bench_collapse_redraw(c: &mut Criterion) {
    let dataset = Dataset::from_value(org_chart(5, 4, "r")).expect("dataset");
    let mut chart = TreeChart::new(
        ChartOptions::new(true),
        Some(&dataset),
        HeadlessSvgSurface::new(),
        HeadlessOverlay::new(Size::new(1280.0, 720.0)),
    )
    .expect("chart");
    chart.init().expect("init");

    // Toggling the first child of the root hides and restores a quarter of the tree.
    c.bench_function("collapse_redraw", |b| {
        b.iter(|| {
            chart.on_click_node(black_box(1)).expect("click");
        })
    });

    c.bench_function("update_dataset", |b| {
        b.iter(|| chart.update_dataset(black_box(Some(&dataset))).expect("update"))
    });
}

criterion_group!(benches, bench_collapse_redraw);
criterion_main!(benches);
