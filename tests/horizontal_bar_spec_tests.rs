use chart_session::ChartError;
use chart_session::api::{
    AxisSide, BarLayoutMode, BarMode, Orientation, SeriesSpec, TraceKind,
    build_horizontal_bar_spec,
};
use chart_session::core::{CellValue, Column, Dataset};

fn regions() -> Dataset {
    Dataset::new(
        "regions.csv",
        vec![
            Column::new(
                "region",
                vec![
                    CellValue::Text("north".to_owned()),
                    CellValue::Text("south".to_owned()),
                ],
            ),
            Column::new("q1", vec![CellValue::Number(12.0), CellValue::Number(7.0)]),
            Column::new("q2", vec![CellValue::Number(9.0), CellValue::Number(11.0)]),
        ],
    )
    .expect("dataset")
}

#[test]
fn horizontal_bars_swap_axes() {
    let dataset = regions();
    let spec = build_horizontal_bar_spec(&dataset, "By region", "region", &[SeriesSpec::new("q1")], None)
        .expect("spec");

    let trace = &spec.traces[0];
    assert_eq!(trace.kind, TraceKind::Bar);
    assert_eq!(trace.orientation, Orientation::Horizontal);
    assert_eq!(trace.x_values, dataset.column("q1").expect("q1").values);
    assert_eq!(trace.y_values, dataset.column("region").expect("region").values);
    assert_eq!(trace.axis_side, AxisSide::Left);
    assert!(!spec.layout.secondary_axis_enabled);
}

#[test]
fn stacking_applies_to_multiple_series() {
    let dataset = regions();
    let series = vec![SeriesSpec::new("q1"), SeriesSpec::new("q2")];
    let spec = build_horizontal_bar_spec(&dataset, "", "region", &series, Some(BarMode::Stacked))
        .expect("spec");
    assert_eq!(spec.layout.bar_mode, BarLayoutMode::Stack);
    assert_eq!(spec.trace_names(), vec!["q1", "q2"]);
}

#[test]
fn single_series_ignores_bar_mode() {
    let dataset = regions();
    let series = vec![SeriesSpec::new("q2")];
    let stacked = build_horizontal_bar_spec(&dataset, "", "region", &series, Some(BarMode::Stacked))
        .expect("stacked");
    let omitted = build_horizontal_bar_spec(&dataset, "", "region", &series, None).expect("omitted");
    assert_eq!(stacked, omitted);
    assert_eq!(stacked.layout.bar_mode, BarLayoutMode::Group);
}

#[test]
fn unknown_category_column_fails() {
    let err = build_horizontal_bar_spec(&regions(), "", "country", &[SeriesSpec::new("q1")], None)
        .expect_err("unknown column");
    assert!(matches!(err, ChartError::ColumnNotFound { .. }));
}
