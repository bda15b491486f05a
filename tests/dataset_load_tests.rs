use approx::assert_abs_diff_eq;
use weightcard::api::{FlipCardWidget, LoadState, WidgetConfig};
use weightcard::core::{Dataset, DeliverableType};
use weightcard::error::CardError;
use weightcard::interaction::{RenderRequest, WidgetEvent};
use weightcard::render::{Color, NullRenderer};

const WEIGHTS_CSV: &str = include_str!("fixtures/weights.csv");

fn fixture_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/weights.csv")
}

#[test]
fn fixture_parses_into_rows() {
    let dataset = Dataset::from_csv_str(WEIGHTS_CSV).expect("parse fixture");

    assert_eq!(dataset.len(), 7);
    assert!(dataset.has_component_data());
    assert!(dataset.can_stack());
    assert_abs_diff_eq!(dataset.total_weight(), 1.0, epsilon = 1e-12);

    let first = &dataset.rows()[0];
    assert_eq!(first.deliverable, "Reading Quiz");
    assert_eq!(first.component.as_deref(), Some("Quizzes"));
    assert_eq!(first.kind, DeliverableType::Individual);
    assert_abs_diff_eq!(first.weight, 0.05, epsilon = 1e-12);
    assert_eq!(first.sequence, Some(1));
}

#[test]
fn path_and_string_loads_agree() {
    let from_path = Dataset::from_path(fixture_path()).expect("load fixture file");
    let from_str = Dataset::from_csv_str(WEIGHTS_CSV).expect("parse fixture");
    assert_eq!(from_path, from_str);
}

#[test]
fn malformed_cells_are_kept_leniently() {
    let csv = "Deliverable,Component,Type,Weight,Sequence\n\
               Poster,,Pair,abc,x\n\
               Quiz, Exams ,Individual, 12.5 % ,3rd\n";
    let dataset = Dataset::from_csv_str(csv).expect("parse");

    let poster = &dataset.rows()[0];
    assert_eq!(poster.component, None);
    assert_eq!(poster.kind, DeliverableType::Other("Pair".to_owned()));
    assert!(poster.weight.is_nan());
    assert_eq!(poster.sequence, None);
    assert_eq!(poster.sequence_or_zero(), 0);

    let quiz = &dataset.rows()[1];
    assert_eq!(quiz.component.as_deref(), Some("Exams"));
    assert_abs_diff_eq!(quiz.weight, 0.125, epsilon = 1e-12);
    assert_eq!(quiz.sequence, Some(3));

    // NaN weights do not poison the total.
    assert_abs_diff_eq!(dataset.total_weight(), 0.125, epsilon = 1e-12);
    assert!(!dataset.can_stack());
}

#[test]
fn dataset_without_component_column_has_no_component_data() {
    let csv = "Deliverable,Type,Weight,Sequence\nQuiz,Individual,50%,1\nProject,Team,50%,2\n";
    let dataset = Dataset::from_csv_str(csv).expect("parse");
    assert_eq!(dataset.len(), 2);
    assert!(!dataset.has_component_data());
    assert!(dataset.can_stack());
}

#[test]
fn header_only_file_is_empty() {
    let dataset =
        Dataset::from_csv_str("Deliverable,Component,Type,Weight,Sequence\n").expect("parse");
    assert!(dataset.is_empty());
    assert!(!dataset.has_component_data());
    assert_eq!(dataset.total_weight(), 0.0);
}

#[test]
fn missing_file_reports_load_error() {
    let err = Dataset::from_path("does/not/exist.csv").expect_err("missing file must fail");
    match err {
        CardError::Load { source_name, .. } => assert_eq!(source_name, "does/not/exist.csv"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn widget_shows_message_when_load_fails() {
    let config = WidgetConfig::default().with_data_source("grades.csv");
    let mut widget = FlipCardWidget::new(NullRenderer::default(), config).expect("widget init");
    widget
        .load_path("does/not/exist.csv")
        .expect("failed load still renders");

    let expected = "Error loading data. Please ensure 'grades.csv' is available.";
    assert_eq!(
        widget.load_state(),
        &LoadState::Failed {
            message: expected.to_owned()
        }
    );

    let frame = widget.last_frame().expect("message frame");
    let message = frame
        .texts
        .iter()
        .find(|text| text.text == expected)
        .expect("message text");
    assert_eq!(message.color, Color::RED);
    assert_eq!(frame.hit_regions.len(), 0);
    assert_eq!(widget.renderer().frames_rendered, 1);

    let request = widget
        .handle_event(&WidgetEvent::FlipToChart)
        .expect("ignored event");
    assert_eq!(request, RenderRequest::None);
    assert_eq!(widget.renderer().frames_rendered, 1);
}

#[test]
fn events_before_load_are_ignored() {
    let mut widget = FlipCardWidget::new(NullRenderer::default(), WidgetConfig::default())
        .expect("widget init");
    assert_eq!(widget.load_state(), &LoadState::Loading);

    let request = widget
        .handle_event(&WidgetEvent::FlipToChart)
        .expect("ignored event");
    assert_eq!(request, RenderRequest::None);
    assert!(widget.last_frame().is_none());
    assert!(widget.dataset().is_none());
    assert!(widget.table_lines().is_empty());
}

#[test]
fn second_load_result_is_ignored() {
    let mut widget = FlipCardWidget::new(NullRenderer::default(), WidgetConfig::default())
        .expect("widget init");
    widget.load_csv_str(WEIGHTS_CSV).expect("first load");
    widget
        .finish_load(Err(CardError::InvalidData("late".to_owned())))
        .expect("second load is a no-op");

    assert!(matches!(widget.load_state(), LoadState::Ready(_)));
    assert_eq!(widget.dataset().map(Dataset::len), Some(7));
    assert_eq!(widget.renderer().frames_rendered, 1);
}
