use autochart::{
    AdvisorError, ChartAdvisor, ChartRequest, ChartType, ColumnKind, PlotError, SeriesData,
};
use polars::prelude::*;
use proptest::prelude::*;

/// 2023-01-01 as days since the epoch.
const JAN_1_2023: i32 = 19358;

fn sales_frame() -> DataFrame {
    let dates: Vec<i32> = (0..10).map(|d| JAN_1_2023 + d).collect();
    let date = Column::new("Date".into(), dates)
        .cast(&DataType::Date)
        .expect("date column");
    let sales = Column::new(
        "Sales".into(),
        [100i64, 200, 150, 300, 250, 400, 500, 450, 550, 600],
    );
    let category = Column::new(
        "Category".into(),
        ["A", "B", "A", "B", "A", "B", "A", "B", "A", "B"],
    )
    .cast(&DataType::Categorical(None, Default::default()))
    .expect("categorical column");

    DataFrame::new(vec![date, sales, category]).expect("frame")
}

#[test]
fn suggests_one_chart_per_column_in_order() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let suggestions: Vec<(String, &str)> = advisor
        .suggest_chart()
        .into_iter()
        .map(|s| (s.column, s.chart.label()))
        .collect();

    assert_eq!(
        suggestions,
        vec![
            ("Date".to_string(), "Time Series"),
            ("Sales".to_string(), "Histogram"),
            ("Category".to_string(), "Bar Chart"),
        ]
    );
}

#[test]
fn line_chart_title() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let fig = advisor
        .generate_chart("Date", Some("Sales"), "line")
        .expect("line chart");

    assert_eq!(fig.title(), Some("Line Chart: Date vs Sales"));
    assert_eq!(fig.data().len(), 1);
    assert!(fig.data()[0].x.is_temporal());
}

#[test]
fn bar_and_scatter_titles() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let bar = advisor
        .generate_chart("Category", Some("Sales"), "bar")
        .expect("bar chart");
    assert_eq!(bar.title(), Some("Bar Chart: Category vs Sales"));

    let scatter = advisor
        .generate_chart("Date", Some("Sales"), "scatter")
        .expect("scatter chart");
    assert_eq!(scatter.title(), Some("Scatter Plot: Date vs Sales"));
}

#[test]
fn histogram_title_has_no_vs_clause() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let fig = advisor
        .generate_chart("Sales", None, "histogram")
        .expect("histogram");
    assert_eq!(fig.title(), Some("Histogram: Sales"));

    let ignored_y = advisor
        .generate_chart("Sales", Some("Date"), "histogram")
        .expect("histogram");
    assert_eq!(ignored_y.title(), Some("Histogram: Sales"));
    assert!(ignored_y.data()[0].y.is_none());
}

#[test]
fn unsupported_chart_types_fail() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    for token in ["pie", "Line", "HISTOGRAM", "", "bar "] {
        let err = advisor
            .generate_chart("Date", Some("Sales"), token)
            .unwrap_err();
        assert!(
            matches!(&err, AdvisorError::UnsupportedChartType(t) if t == token),
            "{token:?} gave {err:?}"
        );
    }
}

#[test]
fn unknown_columns_surface_from_the_plotter() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let err = advisor
        .generate_chart("Date", Some("Profit"), "line")
        .unwrap_err();
    assert!(matches!(err, AdvisorError::Plot(PlotError::Polars(_))));
}

#[test]
fn two_axis_chart_without_y_fails_in_the_plotter() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let err = advisor.generate_chart("Date", None, "bar").unwrap_err();
    assert!(matches!(
        err,
        AdvisorError::Plot(PlotError::MissingAxis {
            chart: ChartType::Bar,
            ..
        })
    ));
}

#[test]
fn dashboard_combines_first_traces() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let fig = advisor
        .generate_dashboard(&[
            ChartRequest::new("Date", Some("Sales"), "line"),
            ChartRequest::new("Category", Some("Sales"), "bar"),
        ])
        .expect("dashboard");

    assert_eq!(fig.data().len(), 2);
    assert_eq!(fig.title(), Some("Dashboard"));
    assert!(fig.layout().show_legend);
    assert_eq!(fig.data()[0].kind, ChartType::Line);
    assert_eq!(fig.data()[1].kind, ChartType::Bar);
    assert_eq!(fig.data()[1].name, "Bar Chart: Category vs Sales");
}

#[test]
fn dashboard_keeps_duplicates() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);
    let request = ChartRequest::new("Sales", None, "histogram");

    let fig = advisor
        .generate_dashboard(&[request.clone(), request])
        .expect("dashboard");
    assert_eq!(fig.data().len(), 2);
}

#[test]
fn empty_dashboard_is_still_titled() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let fig = advisor.generate_dashboard(&[]).expect("dashboard");
    assert!(fig.data().is_empty());
    assert_eq!(fig.title(), Some("Dashboard"));
    assert!(fig.layout().show_legend);
}

#[test]
fn dashboard_aborts_on_unsupported_request() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let err = advisor
        .generate_dashboard(&[
            ChartRequest::new("Date", Some("Sales"), "line"),
            ChartRequest::new("Category", Some("Sales"), "pie"),
        ])
        .unwrap_err();
    assert!(matches!(err, AdvisorError::UnsupportedChartType(t) if t == "pie"));
}

#[test]
fn dashboard_requests_from_json() {
    let df = sales_frame();
    let advisor = ChartAdvisor::new(&df);

    let requests: Vec<ChartRequest> = serde_json::from_str(
        r#"[
            {"x": "Date", "y": "Sales", "chart_type": "line"},
            {"x": "Sales", "chart_type": "histogram"}
        ]"#,
    )
    .expect("requests");
    let fig = advisor.generate_dashboard(&requests).expect("dashboard");
    assert_eq!(fig.data().len(), 2);

    let missing_type = serde_json::from_str::<Vec<ChartRequest>>(r#"[{"x": "Date"}]"#);
    assert!(missing_type.is_err());
}

#[test]
fn advisor_from_json_records() {
    let advisor = ChartAdvisor::from_json(&serde_json::json!([
        {"Sales": 100, "Region": "N", "Promo": true},
        {"Sales": 200, "Region": "S", "Promo": false}
    ]))
    .expect("advisor");

    let labels: Vec<&str> = advisor
        .suggest_chart()
        .iter()
        .map(|s| s.chart.label())
        .collect();
    assert_eq!(labels, ["Histogram", "Scatter Plot", "Scatter Plot"]);

    let fig = advisor
        .generate_chart("Region", Some("Sales"), "bar")
        .expect("bar chart");
    assert_eq!(
        fig.data()[0].x,
        SeriesData::Labels(vec![Some("N".into()), Some("S".into())])
    );
}

#[test]
fn advisor_rejects_non_tables() {
    for value in [
        serde_json::json!("Sales"),
        serde_json::json!(1.5),
        serde_json::json!([1, 2, 3]),
        serde_json::json!({"Sales": 100}),
    ] {
        let err = ChartAdvisor::try_from(&value).unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInputKind(_)), "{value}");
    }
}

fn column_for(name: &str, kind: ColumnKind, value: i32) -> Column {
    match kind {
        ColumnKind::Numeric => Column::new(name.into(), [f64::from(value)]),
        ColumnKind::Temporal => Column::new(name.into(), [value])
            .cast(&DataType::Date)
            .expect("date column"),
        ColumnKind::Categorical => Column::new(name.into(), [value.to_string()])
            .cast(&DataType::Categorical(None, Default::default()))
            .expect("categorical column"),
        ColumnKind::Other => Column::new(name.into(), [value.to_string()]),
    }
}

fn kind_strategy() -> impl Strategy<Value = ColumnKind> {
    prop_oneof![
        Just(ColumnKind::Numeric),
        Just(ColumnKind::Temporal),
        Just(ColumnKind::Categorical),
        Just(ColumnKind::Other),
    ]
}

proptest! {
    #[test]
    fn suggestions_follow_declared_types(
        columns in prop::collection::vec((kind_strategy(), -1000i32..1000), 0..12)
    ) {
        let df = DataFrame::new(
            columns
                .iter()
                .enumerate()
                .map(|(i, (kind, value))| column_for(&format!("c{i}"), *kind, *value))
                .collect(),
        )
        .expect("frame");
        let advisor = ChartAdvisor::new(&df);
        let suggestions = advisor.suggest_chart();

        prop_assert_eq!(suggestions.len(), columns.len());
        for (i, (suggestion, (kind, _))) in suggestions.iter().zip(&columns).enumerate() {
            prop_assert_eq!(&suggestion.column, &format!("c{i}"));
            prop_assert_eq!(suggestion.chart, ChartType::suggested_for(*kind));
        }
    }
}
