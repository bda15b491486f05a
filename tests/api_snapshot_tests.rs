use weightcard::api::{
    FlipCardWidget, LoadStatus, ViewSnapshot, WIDGET_SNAPSHOT_JSON_SCHEMA_V1, WidgetConfig,
    WidgetSnapshot, WidgetSnapshotJsonContractV1,
};
use weightcard::core::{PrimarySort, SecondarySort, TableColumn, TableLine};
use weightcard::interaction::{ActiveView, ChartKind, WidgetEvent};
use weightcard::render::NullRenderer;

const WEIGHTS_CSV: &str = include_str!("fixtures/weights.csv");

fn loaded() -> FlipCardWidget<NullRenderer> {
    let mut widget = FlipCardWidget::new(NullRenderer::default(), WidgetConfig::default())
        .expect("widget init");
    widget.load_csv_str(WEIGHTS_CSV).expect("load csv");
    widget
}

#[test]
fn snapshot_reports_table_state() {
    let widget = loaded();
    let snapshot = widget.snapshot();

    assert_eq!(snapshot.load, LoadStatus::Ready { rows: 7 });
    assert_eq!(snapshot.card.width, 800);
    assert_eq!(snapshot.active, ActiveView::Table);
    assert_eq!(snapshot.primary_sort, PrimarySort::All);
    assert_eq!(snapshot.secondary_sort, SecondarySort::Weight);
    assert!(!snapshot.stacked);
    match snapshot.view {
        ViewSnapshot::Table { lines } => {
            assert_eq!(lines.len(), 12);
            assert_eq!(lines.iter().filter(|line| line.is_group_header()).count(), 5);
        }
        other => panic!("expected table view, got {other:?}"),
    }
}

#[test]
fn snapshot_before_load_is_empty() {
    let widget = FlipCardWidget::new(NullRenderer::default(), WidgetConfig::default())
        .expect("widget init");
    let snapshot = widget.snapshot();
    assert_eq!(snapshot.load, LoadStatus::Loading);
    assert_eq!(snapshot.view, ViewSnapshot::Empty);
}

#[test]
fn json_contract_v1_round_trips() {
    let mut widget = loaded();
    for event in [
        WidgetEvent::SortTable(TableColumn::Weight),
        WidgetEvent::FlipToChart,
        WidgetEvent::ArrowRight,
        WidgetEvent::ArrowRight,
        WidgetEvent::SetStacked(true),
        WidgetEvent::SelectElement("Essay-Team".to_owned()),
    ] {
        widget.handle_event(&event).expect("handle event");
    }

    let json = widget
        .snapshot_json_contract_v1_pretty()
        .expect("serialize contract");
    let payload: WidgetSnapshotJsonContractV1 =
        serde_json::from_str(&json).expect("contract payload");
    assert_eq!(payload.schema_version, WIDGET_SNAPSHOT_JSON_SCHEMA_V1);

    let restored = WidgetSnapshot::from_json_compat_str(&json).expect("parse contract");
    let original = widget.snapshot();
    assert_eq!(restored.active, ActiveView::Chart(ChartKind::Horizontal));
    assert_eq!(restored.table_sort, original.table_sort);
    assert_eq!(restored.selections, original.selections);
    assert!(restored.stacked);
    assert!(restored.stacked_toggle_visible);
    match restored.view {
        ViewSnapshot::Horizontal { records, .. } => {
            let labels: Vec<&str> = records.iter().map(|record| record.label.as_str()).collect();
            assert_eq!(labels[0], "Final Exam");
            assert_eq!(labels.len(), 5);
        }
        other => panic!("expected horizontal view, got {other:?}"),
    }
}

#[test]
fn bare_snapshot_json_is_accepted() {
    let widget = loaded();
    let bare = serde_json::to_string(&widget.snapshot()).expect("serialize snapshot");
    let restored = WidgetSnapshot::from_json_compat_str(&bare).expect("parse bare snapshot");
    assert_eq!(restored.active, ActiveView::Table);
    let ViewSnapshot::Table { lines } = restored.view else {
        panic!("expected table view");
    };
    assert_eq!(
        lines[0],
        TableLine::GroupHeader {
            component: "Exams".to_owned()
        }
    );
}

#[test]
fn unknown_schema_version_is_rejected() {
    let widget = loaded();
    let json = widget
        .snapshot_json_contract_v1_pretty()
        .expect("serialize contract");
    let bumped = json.replacen(
        &format!("\"schema_version\": {WIDGET_SNAPSHOT_JSON_SCHEMA_V1}"),
        "\"schema_version\": 99",
        1,
    );
    assert_ne!(bumped, json);
    assert!(WidgetSnapshot::from_json_compat_str(&bumped).is_err());
}

#[test]
fn config_round_trips_through_json() {
    let config = WidgetConfig::default()
        .with_title("Syllabus")
        .with_data_source("syllabus.csv");
    let json = config.to_json_pretty().expect("serialize config");
    let restored = WidgetConfig::from_json_str(&json).expect("parse config");
    assert_eq!(restored.title, "Syllabus");
    assert_eq!(restored.data_source, "syllabus.csv");
    assert_eq!(
        restored.load_error_message(),
        "Error loading data. Please ensure 'syllabus.csv' is available."
    );

    assert!(WidgetConfig::from_json_str(r#"{"card":{"width":0,"height":600}}"#).is_err());
}
