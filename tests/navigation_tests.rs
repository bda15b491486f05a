use weightcard::api::{FlipCardWidget, WidgetConfig};
use weightcard::core::{PrimarySort, SecondarySort};
use weightcard::interaction::{ActiveView, ArrowVisibility, ChartKind, RenderRequest, WidgetEvent};
use weightcard::render::{HitTarget, NullRenderer};

const WEIGHTS_CSV: &str = include_str!("fixtures/weights.csv");

const NO_COMPONENT_CSV: &str = "Deliverable,Component,Type,Weight,Sequence\n\
                                Quiz,,Individual,40%,1\n\
                                Project,,Team,60%,2\n";

fn loaded(csv: &str) -> FlipCardWidget<NullRenderer> {
    let mut widget = FlipCardWidget::new(NullRenderer::default(), WidgetConfig::default())
        .expect("widget init");
    widget.load_csv_str(csv).expect("load csv");
    widget
}

fn send(widget: &mut FlipCardWidget<NullRenderer>, event: WidgetEvent) -> RenderRequest {
    widget.handle_event(&event).expect("handle event")
}

fn controls(widget: &FlipCardWidget<NullRenderer>) -> Vec<WidgetEvent> {
    widget
        .last_frame()
        .expect("frame")
        .hit_regions
        .iter()
        .filter_map(|region| match &region.target {
            HitTarget::Control(event) => Some(event.clone()),
            HitTarget::Element(_) => None,
        })
        .collect()
}

#[test]
fn starts_on_table_face() {
    let widget = loaded(WEIGHTS_CSV);
    let snapshot = widget.snapshot();
    assert_eq!(snapshot.active, ActiveView::Table);
    assert_eq!(snapshot.subtitle, None);
    assert_eq!(snapshot.arrows, ArrowVisibility::HIDDEN);
    assert!(!snapshot.sort_controls_visible);
    assert!(controls(&widget).contains(&WidgetEvent::FlipToChart));
}

#[test]
fn flip_to_chart_always_opens_donut() {
    let mut widget = loaded(WEIGHTS_CSV);
    assert_eq!(send(&mut widget, WidgetEvent::FlipToChart), RenderRequest::Chart);
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Donut));

    send(&mut widget, WidgetEvent::ArrowRight);
    send(&mut widget, WidgetEvent::ArrowRight);
    assert_eq!(
        widget.state().active(),
        ActiveView::Chart(ChartKind::Horizontal)
    );

    assert_eq!(send(&mut widget, WidgetEvent::FlipToTable), RenderRequest::Table);
    send(&mut widget, WidgetEvent::FlipToChart);
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Donut));
}

#[test]
fn arrows_walk_all_three_charts_with_component_data() {
    let mut widget = loaded(WEIGHTS_CSV);
    send(&mut widget, WidgetEvent::FlipToChart);

    let snapshot = widget.snapshot();
    assert_eq!(snapshot.subtitle.as_deref(), Some("Individual versus Team"));
    assert_eq!(
        snapshot.arrows,
        ArrowVisibility {
            left: false,
            right: true
        }
    );

    send(&mut widget, WidgetEvent::ArrowRight);
    let snapshot = widget.snapshot();
    assert_eq!(snapshot.active, ActiveView::Chart(ChartKind::Stacked));
    assert_eq!(snapshot.subtitle.as_deref(), Some("Components"));
    assert!(snapshot.arrows.left && snapshot.arrows.right);

    send(&mut widget, WidgetEvent::ArrowRight);
    let snapshot = widget.snapshot();
    assert_eq!(snapshot.active, ActiveView::Chart(ChartKind::Horizontal));
    assert_eq!(snapshot.subtitle.as_deref(), Some("Deliverables"));
    assert!(snapshot.arrows.left && !snapshot.arrows.right);
    assert!(snapshot.sort_controls_visible);

    send(&mut widget, WidgetEvent::ArrowLeft);
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Stacked));
}

#[test]
fn stacked_chart_is_skipped_without_component_data() {
    let mut widget = loaded(NO_COMPONENT_CSV);
    send(&mut widget, WidgetEvent::FlipToChart);

    send(&mut widget, WidgetEvent::ArrowRight);
    assert_eq!(
        widget.state().active(),
        ActiveView::Chart(ChartKind::Horizontal)
    );

    send(&mut widget, WidgetEvent::ArrowLeft);
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Donut));
}

#[test]
fn arrows_at_the_ends_do_nothing() {
    let mut widget = loaded(WEIGHTS_CSV);
    send(&mut widget, WidgetEvent::FlipToChart);
    assert_eq!(send(&mut widget, WidgetEvent::ArrowLeft), RenderRequest::None);
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Donut));
    assert!(!controls(&widget).contains(&WidgetEvent::ArrowLeft));

    send(&mut widget, WidgetEvent::ArrowRight);
    send(&mut widget, WidgetEvent::ArrowRight);
    assert_eq!(send(&mut widget, WidgetEvent::ArrowRight), RenderRequest::None);
    assert!(!controls(&widget).contains(&WidgetEvent::ArrowRight));
}

#[test]
fn chart_events_are_ignored_on_the_table_face() {
    let mut widget = loaded(WEIGHTS_CSV);
    let before = widget.state().clone();

    for event in [
        WidgetEvent::ArrowRight,
        WidgetEvent::ArrowLeft,
        WidgetEvent::FlipToTable,
        WidgetEvent::SetPrimarySort(PrimarySort::Component),
        WidgetEvent::SetSecondarySort(SecondarySort::Sequence),
        WidgetEvent::SetStacked(true),
        WidgetEvent::SelectElement("Individual".to_owned()),
    ] {
        assert_eq!(send(&mut widget, event), RenderRequest::None);
    }
    assert_eq!(widget.state(), &before);
}

#[test]
fn sort_controls_only_exist_on_horizontal_chart() {
    let mut widget = loaded(WEIGHTS_CSV);
    send(&mut widget, WidgetEvent::FlipToChart);
    assert_eq!(
        send(
            &mut widget,
            WidgetEvent::SetPrimarySort(PrimarySort::Component)
        ),
        RenderRequest::None
    );
    assert_eq!(widget.state().primary_sort(), PrimarySort::All);

    send(&mut widget, WidgetEvent::ArrowRight);
    send(&mut widget, WidgetEvent::ArrowRight);
    let visible = controls(&widget);
    for primary in PrimarySort::OPTIONS {
        assert!(visible.contains(&WidgetEvent::SetPrimarySort(primary)));
    }
    for secondary in SecondarySort::OPTIONS {
        assert!(visible.contains(&WidgetEvent::SetSecondarySort(secondary)));
    }
    assert!(visible.contains(&WidgetEvent::SetStacked(true)));
    assert!(visible.contains(&WidgetEvent::FlipToTable));
}

#[test]
fn clicking_controls_dispatches_their_events() {
    let mut widget = loaded(WEIGHTS_CSV);

    // Flip icon sits in the top right corner of the title row.
    let request = widget.pointer_click(744.0, 44.0).expect("click flip icon");
    assert_eq!(request, RenderRequest::Chart);
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Donut));

    let frame = widget.last_frame().expect("donut frame");
    let right_arrow = frame
        .hit_regions
        .iter()
        .find(|region| region.target == HitTarget::Control(WidgetEvent::ArrowRight))
        .expect("right arrow");
    let weightcard::render::HitShape::Rect(rect) = right_arrow.shape else {
        panic!("arrow must be a rectangle");
    };
    widget
        .pointer_click(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
        .expect("click arrow");
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Stacked));
}

#[test]
fn resize_updates_card_width_and_rejects_zero() {
    let mut widget = loaded(WEIGHTS_CSV);
    assert_eq!(
        send(
            &mut widget,
            WidgetEvent::Resize {
                width: 1000,
                height: 700
            }
        ),
        RenderRequest::TableLayout
    );
    assert_eq!(widget.card_viewport().width, 1000);

    send(&mut widget, WidgetEvent::FlipToChart);
    let area = widget.chart_area();
    assert_eq!(area.width, 800.0);
    assert_eq!(area.x, 100.0);

    let err = widget
        .handle_event(&WidgetEvent::Resize {
            width: 0,
            height: 700,
        })
        .expect_err("zero width must fail");
    assert!(matches!(
        err,
        weightcard::CardError::InvalidViewport {
            width: 0,
            height: 700
        }
    ));
    assert_eq!(widget.card_viewport().width, 1000);
}

#[test]
fn resize_on_a_chart_redraws_and_clears_selection() {
    let mut widget = loaded(WEIGHTS_CSV);
    send(&mut widget, WidgetEvent::FlipToChart);
    send(&mut widget, WidgetEvent::SelectElement("Individual".to_owned()));
    assert!(widget.active_selection().contains("Individual"));

    let request = send(
        &mut widget,
        WidgetEvent::Resize {
            width: 900,
            height: 700,
        },
    );
    assert_eq!(request, RenderRequest::Chart);
    assert!(widget.active_selection().is_empty());
    assert_eq!(widget.state().active(), ActiveView::Chart(ChartKind::Donut));
}
