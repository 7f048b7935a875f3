use std::time::Duration;

use chart_session::api::{
    BarMode, ChartConfig, ChartFamily, PieOptions, PieStyle, SeriesSpec, TraceKind, VisualKind,
};
use chart_session::core::{CellValue, Column, Dataset};
use chart_session::error::DatasetError;
use chart_session::render::NullRenderer;
use chart_session::session::{
    CancellationToken, ConfigStore, InMemoryConfigStore, InMemoryDatasetProvider, PollClock,
    PresentationShell, SessionAddress, SessionDocument, SessionOutcome, SessionPolicy,
    SessionState,
};
use chart_session::{ChartError, SessionError};

#[derive(Debug, Default)]
struct FakeClock {
    now: Duration,
}

impl PollClock for FakeClock {
    fn elapsed(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
    }
}

fn sales() -> Dataset {
    Dataset::new(
        "sales.csv",
        vec![
            Column::new(
                "month",
                ["jan", "feb", "mar"]
                    .into_iter()
                    .map(|m| CellValue::Text(m.to_owned()))
                    .collect(),
            ),
            Column::new(
                "units",
                vec![
                    CellValue::Number(3.0),
                    CellValue::Number(5.0),
                    CellValue::Number(8.0),
                ],
            ),
            Column::new(
                "revenue",
                vec![
                    CellValue::Number(30.0),
                    CellValue::Number(50.0),
                    CellValue::Number(80.0),
                ],
            ),
        ],
    )
    .expect("sales dataset")
}

fn datasets() -> InMemoryDatasetProvider {
    InMemoryDatasetProvider::new()
        .with_dataset("users/ana@example.com/data/sales.csv", sales())
        .with_dataset("sessions/preview_9/data.csv", sales())
        .with_sheet("users/ana@example.com/data/book.xlsx", "Q1", sales())
}

fn shell(store: InMemoryConfigStore) -> PresentationShell<InMemoryConfigStore, InMemoryDatasetProvider, FakeClock> {
    PresentationShell::new(store, datasets(), FakeClock::default(), SessionPolicy::default())
}

#[test]
fn preview_session_renders_once_config_is_published() {
    let config = ChartConfig::pie("Share", PieOptions::new("month", "revenue", PieStyle::Donut));
    let store = InMemoryConfigStore::new().with_document(
        "preview_9",
        SessionDocument::new("ana@example.com", "ignored.csv").with_config(config),
    );
    let mut shell = shell(store);
    let mut renderer = NullRenderer::default();

    let session = shell
        .open_session(
            &SessionAddress::new("preview_9"),
            &CancellationToken::new(),
            &mut renderer,
        )
        .expect("preview renders");

    assert_eq!(session.state(), SessionState::Terminal(SessionOutcome::Rendered));
    assert_eq!(session.poll_attempts(), 1);
    assert_eq!(renderer.render_count, 1);
    let spec = renderer.last_specification.expect("rendered spec");
    assert_eq!(spec.traces[0].kind, TraceKind::Pie);
    assert_eq!(spec.layout.title, "Share");
}

#[test]
fn preview_sessions_cannot_be_edited_or_saved() {
    let config = ChartConfig::combo("c", "month", vec![SeriesSpec::line("units")]);
    let store = InMemoryConfigStore::new().with_document(
        "preview_9",
        SessionDocument::new("ana@example.com", "sales.csv").with_config(config.clone()),
    );
    let mut shell = shell(store);
    let mut session = shell
        .open_session(
            &SessionAddress::new("preview_9"),
            &CancellationToken::new(),
            &mut NullRenderer::default(),
        )
        .expect("preview renders");

    assert!(matches!(
        session.draft(ChartFamily::LineBarCombo),
        Err(SessionError::InvalidTransition { .. })
    ));
    assert!(matches!(
        shell.save_configuration(&mut session, config),
        Err(SessionError::InvalidTransition { .. })
    ));
}

#[test]
fn full_session_assembles_and_saves_a_configuration() {
    let store = InMemoryConfigStore::new()
        .with_document("abc123", SessionDocument::new("ana@example.com", "sales.csv"));
    let mut shell = shell(store);
    let mut renderer = NullRenderer::default();

    let mut session = shell
        .open_session(
            &SessionAddress::new("abc123"),
            &CancellationToken::new(),
            &mut renderer,
        )
        .expect("full session opens");
    assert_eq!(session.state(), SessionState::ConfigLoaded);
    assert_eq!(renderer.render_count, 0);

    let draft = session
        .draft(ChartFamily::LineBarCombo)
        .expect("full sessions edit")
        .with_title("Units vs revenue")
        .with_x_axis("month")
        .expect("month exists")
        .add_default_series("units")
        .expect("units exists")
        .add_series(SeriesSpec::bar("revenue"))
        .expect("revenue exists")
        .with_bar_mode(BarMode::Stacked);

    shell
        .render_draft(&session, &draft, &mut renderer)
        .expect("draft renders");
    assert_eq!(renderer.render_count, 1);
    assert_eq!(renderer.last_trace_count, 2);

    let config = draft.finish().expect("valid draft");
    let saved = shell
        .save_configuration(&mut session, config.clone())
        .expect("saved");
    assert_eq!(saved.session_id, "abc123");
    assert_eq!(session.record().config.as_ref(), Some(&config));

    let stored = shell.store().read("abc123").expect("stored");
    assert_eq!(stored.visualization_config, Some(config));
    assert_eq!(stored.email, "ana@example.com");
}

#[test]
fn draft_errors_stay_local_to_the_chart() {
    let store = InMemoryConfigStore::new()
        .with_document("abc123", SessionDocument::new("ana@example.com", "sales.csv"));
    let mut shell = shell(store);
    let mut renderer = NullRenderer::default();
    let session = shell
        .open_session(
            &SessionAddress::new("abc123"),
            &CancellationToken::new(),
            &mut renderer,
        )
        .expect("opens");

    let empty = session.draft(ChartFamily::HorizontalBar).expect("draft");
    let err = shell
        .render_draft(&session, &empty, &mut renderer)
        .expect_err("no category column yet");
    assert!(matches!(err, ChartError::Validation(_)));
    assert_eq!(session.state(), SessionState::ConfigLoaded);
    assert_eq!(renderer.render_count, 0);

    let rejected = session
        .draft(ChartFamily::HorizontalBar)
        .expect("draft")
        .add_series(SeriesSpec::new("profit"));
    assert_eq!(
        rejected.expect_err("unknown column"),
        ChartError::ColumnNotFound {
            column: "profit".to_owned()
        }
    );
}

#[test]
fn saving_an_invalid_configuration_keeps_the_stored_document() {
    let store = InMemoryConfigStore::new()
        .with_document("abc123", SessionDocument::new("ana@example.com", "sales.csv"));
    let mut shell = shell(store);
    let mut session = shell
        .open_session(
            &SessionAddress::new("abc123"),
            &CancellationToken::new(),
            &mut NullRenderer::default(),
        )
        .expect("opens");

    let invalid = ChartConfig::combo("c", "month", vec![SeriesSpec::line("profit")]);
    let err = shell
        .save_configuration(&mut session, invalid)
        .expect_err("invalid");

    assert!(matches!(
        err,
        SessionError::Chart(ChartError::ColumnNotFound { .. })
    ));
    assert!(session.record().config.is_none());
    let stored = shell.store().read("abc123").expect("stored");
    assert!(stored.visualization_config.is_none());
}

#[test]
fn stored_full_config_is_rendered_on_open() {
    let config = ChartConfig::horizontal_bar(
        "Units",
        "month",
        vec![SeriesSpec::new("units").with_visual_kind(VisualKind::Bar)],
    );
    let store = InMemoryConfigStore::new().with_document(
        "abc123",
        SessionDocument::new("ana@example.com", "book.xlsx").with_config(config),
    );
    let mut shell = shell(store);
    let mut renderer = NullRenderer::default();

    let session = shell
        .open_session(
            &SessionAddress::new("abc123"),
            &CancellationToken::new(),
            &mut renderer,
        )
        .expect("spreadsheet falls back to first sheet");

    assert_eq!(session.state(), SessionState::Terminal(SessionOutcome::Rendered));
    assert_eq!(session.dataset().row_count(), 3);
    assert_eq!(renderer.render_count, 1);
}

#[test]
fn unsupported_dataset_format_fails_the_session() {
    let store = InMemoryConfigStore::new()
        .with_document("abc123", SessionDocument::new("ana@example.com", "notes.txt"));
    let mut shell = shell(store);

    let err = shell
        .open_session(
            &SessionAddress::new("abc123"),
            &CancellationToken::new(),
            &mut NullRenderer::default(),
        )
        .expect_err("txt is not a dataset");

    assert_eq!(
        err,
        SessionError::Dataset(DatasetError::UnsupportedFormat {
            file_name: "notes.txt".to_owned()
        })
    );
    assert!(err.user_message().starts_with("The dataset could not be loaded"));
}

#[test]
fn builder_failure_terminates_the_session() {
    let config = ChartConfig::combo("c", "month", vec![SeriesSpec::line("profit")]);
    let store = InMemoryConfigStore::new().with_document(
        "preview_9",
        SessionDocument::new("ana@example.com", "sales.csv").with_config(config),
    );
    let mut shell = shell(store);
    let mut renderer = NullRenderer::default();

    let err = shell
        .open_session(
            &SessionAddress::new("preview_9"),
            &CancellationToken::new(),
            &mut renderer,
        )
        .expect_err("profit missing");

    assert!(matches!(
        err,
        SessionError::Chart(ChartError::ColumnNotFound { .. })
    ));
    assert_eq!(renderer.render_count, 0);
    assert!(err.user_message().starts_with("The chart could not be drawn"));
}

#[test]
fn missing_full_session_reports_a_user_message() {
    let mut shell = shell(InMemoryConfigStore::new());
    let err = shell
        .open_session(
            &SessionAddress::new("abc123"),
            &CancellationToken::new(),
            &mut NullRenderer::default(),
        )
        .expect_err("missing");

    assert!(matches!(err, SessionError::ConfigurationMissing { .. }));
    assert!(err.user_message().contains("No saved chart configuration"));
    assert_eq!(shell.clock().elapsed(), Duration::ZERO);
}

#[test]
fn address_from_query_pairs_drives_the_shell() {
    let address = SessionAddress::from_query_pairs([
        ("session_id", "preview_9"),
        ("email", "ana@example.com"),
    ])
    .expect("address");
    let config = ChartConfig::combo("c", "month", vec![SeriesSpec::line("units")]);
    let store = InMemoryConfigStore::new().with_document(
        "preview_9",
        SessionDocument::new("ana@example.com", "sales.csv").with_config(config),
    );
    let mut shell = shell(store);

    let session = shell
        .open_session(&address, &CancellationToken::new(), &mut NullRenderer::default())
        .expect("renders");
    assert_eq!(session.record().email, "ana@example.com");

    let err = SessionAddress::from_query_pairs([("mode", "preview")]).expect_err("no id");
    assert_eq!(err.user_message(), "No session ID provided.");
}
