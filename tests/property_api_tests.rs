use chart_session::api::{
    AxisSide, ChartConfig, PieOptions, PieStyle, SeriesSpec, VisualKind, build_chart_spec,
};
use chart_session::core::{CellValue, Column, Dataset};
use proptest::prelude::*;

const VALUE_COLUMNS: [&str; 4] = ["a", "b", "c", "d"];

fn numeric_dataset(rows: usize) -> Dataset {
    let mut columns = vec![Column::new(
        "x",
        (0..rows).map(|row| CellValue::Text(format!("r{row}"))).collect(),
    )];
    for (offset, name) in VALUE_COLUMNS.iter().enumerate() {
        columns.push(Column::new(
            *name,
            (0..rows)
                .map(|row| CellValue::Number((row * (offset + 1)) as f64))
                .collect(),
        ));
    }
    Dataset::new("numbers", columns).expect("numeric dataset")
}

fn series_strategy() -> impl Strategy<Value = SeriesSpec> {
    (0..VALUE_COLUMNS.len(), any::<bool>(), any::<bool>()).prop_map(|(column, right, bar)| {
        SeriesSpec::new(VALUE_COLUMNS[column])
            .with_axis_side(if right { AxisSide::Right } else { AxisSide::Left })
            .with_visual_kind(if bar { VisualKind::Bar } else { VisualKind::Line })
    })
}

proptest! {
    #[test]
    fn combo_traces_follow_series_order(
        series in prop::collection::vec(series_strategy(), 1..8),
        rows in 0usize..20
    ) {
        let data = numeric_dataset(rows);
        let config = ChartConfig::combo("p", "x", series.clone());
        let spec = build_chart_spec(&data, &config).expect("valid combo");

        prop_assert_eq!(spec.traces.len(), series.len());
        for (trace, requested) in spec.traces.iter().zip(&series) {
            prop_assert_eq!(&trace.name, &requested.column);
            prop_assert_eq!(trace.x_values.len(), rows);
            prop_assert_eq!(trace.axis_side, requested.resolved_axis_side());
        }
    }

    #[test]
    fn secondary_axis_enabled_iff_some_series_on_right(
        series in prop::collection::vec(series_strategy(), 1..8)
    ) {
        let data = numeric_dataset(3);
        let config = ChartConfig::combo("p", "x", series.clone());
        let spec = build_chart_spec(&data, &config).expect("valid combo");

        let any_right = series
            .iter()
            .any(|s| s.resolved_axis_side() == AxisSide::Right);
        prop_assert_eq!(spec.layout.secondary_axis_enabled, any_right);
    }

    #[test]
    fn pie_slices_preserve_the_grand_total(
        rows in prop::collection::vec((0usize..5, 0u32..1_000), 1..60),
        top_n in prop::option::of(1u32..6)
    ) {
        let labels: Vec<CellValue> = rows
            .iter()
            .map(|(label, _)| CellValue::Text(format!("g{label}")))
            .collect();
        let values: Vec<CellValue> = rows
            .iter()
            .map(|(_, value)| CellValue::Number(f64::from(*value)))
            .collect();
        let data = Dataset::new(
            "pie",
            vec![Column::new("label", labels), Column::new("value", values)],
        )
        .expect("pie dataset");

        let mut options = PieOptions::new("label", "value", PieStyle::Pie);
        if let Some(n) = top_n {
            options = options.with_top_n(n);
        }
        let spec = build_chart_spec(&data, &ChartConfig::pie("p", options)).expect("valid pie");
        let trace = &spec.traces[0];
        let slices: Vec<f64> = trace.y_values.iter().filter_map(CellValue::as_f64).collect();

        let mut distinct: Vec<usize> = rows.iter().map(|(label, _)| *label).collect();
        distinct.sort_unstable();
        distinct.dedup();
        let expected_len = top_n.map_or(distinct.len(), |n| distinct.len().min(n as usize));
        prop_assert_eq!(slices.len(), expected_len);

        if top_n.is_none() {
            let grand_total: u64 = rows.iter().map(|(_, value)| u64::from(*value)).sum();
            prop_assert_eq!(slices.iter().sum::<f64>(), grand_total as f64);
        } else {
            prop_assert!(slices.windows(2).all(|pair| pair[0] >= pair[1]));
        }
    }

    #[test]
    fn donut_and_pie_differ_only_in_hole_fraction(
        rows in prop::collection::vec((0usize..4, 1u32..500), 1..30),
        top_n in prop::option::of(1u32..4)
    ) {
        let data = Dataset::new(
            "pie",
            vec![
                Column::new(
                    "label",
                    rows.iter().map(|(label, _)| CellValue::Text(format!("g{label}"))).collect(),
                ),
                Column::new(
                    "value",
                    rows.iter().map(|(_, value)| CellValue::Number(f64::from(*value))).collect(),
                ),
            ],
        )
        .expect("pie dataset");
        let options = |style| {
            let options = PieOptions::new("label", "value", style);
            match top_n {
                Some(n) => options.with_top_n(n),
                None => options,
            }
        };

        let pie = build_chart_spec(&data, &ChartConfig::pie("p", options(PieStyle::Pie)))
            .expect("pie");
        let mut donut = build_chart_spec(&data, &ChartConfig::pie("p", options(PieStyle::Donut)))
            .expect("donut");

        let donut_style = donut.traces[0].pie.as_mut().expect("donut style");
        prop_assert_eq!(donut_style.hole_fraction, 0.4);
        donut_style.hole_fraction = 0.0;
        prop_assert_eq!(donut, pie);
    }
}
