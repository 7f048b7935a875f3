use chart_session::api::{ChartConfig, PieOptions, PieStyle, SeriesSpec, build_chart_spec};
use chart_session::core::{CellValue, Column, Dataset, aggregate_pie_groups};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn pie_columns(rows: usize) -> (Vec<CellValue>, Vec<CellValue>) {
    let labels = (0..rows)
        .map(|i| CellValue::Text(format!("region-{}", i % 64)))
        .collect();
    let values = (0..rows)
        .map(|i| {
            if i % 10 == 0 {
                CellValue::Text(format!("{}.25", i % 97))
            } else {
                CellValue::Number((i % 503) as f64 * 1.5)
            }
        })
        .collect();
    (labels, values)
}

fn bench_pie_aggregation_100k(c: &mut Criterion) {
    let (labels, values) = pie_columns(100_000);

    c.bench_function("pie_aggregation_100k", |b| {
        b.iter(|| {
            let aggregation = aggregate_pie_groups(black_box(&labels), black_box(&values));
            black_box(aggregation.groups.len())
        })
    });
}

fn bench_pie_spec_top_n_100k(c: &mut Criterion) {
    let (labels, values) = pie_columns(100_000);
    let dataset = Dataset::new(
        "bench",
        vec![Column::new("region", labels), Column::new("amount", values)],
    )
    .expect("bench dataset");
    let config = ChartConfig::pie(
        "bench",
        PieOptions::new("region", "amount", PieStyle::Donut).with_top_n(10),
    );

    c.bench_function("pie_spec_top_n_100k", |b| {
        b.iter(|| {
            let spec = build_chart_spec(black_box(&dataset), black_box(&config)).expect("pie spec");
            black_box(spec.traces.len())
        })
    });
}

fn bench_combo_spec_10k(c: &mut Criterion) {
    let rows = 10_000;
    let dataset = Dataset::new(
        "bench",
        vec![
            Column::new(
                "day",
                (0..rows).map(|i| CellValue::Text(format!("d{i}"))).collect(),
            ),
            Column::new(
                "units",
                (0..rows).map(|i| CellValue::Number(i as f64)).collect(),
            ),
            Column::new(
                "revenue",
                (0..rows).map(|i| CellValue::Number(i as f64 * 2.0)).collect(),
            ),
        ],
    )
    .expect("bench dataset");
    let config = ChartConfig::combo(
        "bench",
        "day",
        vec![SeriesSpec::bar("units"), SeriesSpec::line("revenue")],
    );

    c.bench_function("combo_spec_10k", |b| {
        b.iter(|| {
            let spec = build_chart_spec(black_box(&dataset), black_box(&config)).expect("combo spec");
            black_box(spec.traces.len())
        })
    });
}

criterion_group!(
    benches,
    bench_pie_aggregation_100k,
    bench_pie_spec_top_n_100k,
    bench_combo_spec_10k
);
criterion_main!(benches);
