use indexmap::IndexSet;

use crate::core::ordering::max_weight;
use crate::core::{
    HorizontalLayout, HorizontalRecord, LayoutSlot, LinearScale, PrimarySort, SecondarySort,
    fit_segment_label, format_percent,
};
use crate::error::CardResult;
use crate::interaction::WidgetEvent;
use crate::render::{Color, RectPrimitive, RenderFrame, ResolvedPalette, TextHAlign, TextPrimitive};

use super::WidgetConfig;
use super::face_layout::{ChartArea, LABEL_FONT_PX, SMALL_FONT_PX, push_button};

const LABEL_GAP: f64 = 10.0;
const TOTAL_LABEL_GAP: f64 = 5.0;
const CONTROL_WIDTH: f64 = 84.0;
const CONTROL_HEIGHT: f64 = 24.0;
const CONTROL_GAP: f64 = 6.0;
const CONTROL_GROUP_GAP: f64 = 18.0;

/// Sort and stacking controls as drawn in the chart's top margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct HorizontalControls {
    pub primary: PrimarySort,
    pub secondary: SecondarySort,
    pub stacked: bool,
    pub stacked_toggle_visible: bool,
}

/// Upper end of the x domain: the largest record total, or the fallback when
/// that maximum is zero or missing. A negative maximum is kept.
#[must_use]
pub fn horizontal_domain_max(records: &[HorizontalRecord], fallback: f64) -> f64 {
    match max_weight(records.iter().map(HorizontalRecord::total)) {
        Some(max) if max != 0.0 => max,
        _ => fallback,
    }
}

pub(super) fn push_horizontal(
    frame: &mut RenderFrame,
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    area: ChartArea,
    records: &[HorizontalRecord],
    layout: &HorizontalLayout,
    selection: &IndexSet<String>,
) -> CardResult<()> {
    let settings = config.horizontal;
    let margins = settings.margins;
    let plot_x = area.x + margins.left;
    let plot_y = area.y + margins.top;
    let plot_width = (area.width - margins.left - margins.right).max(0.0);
    let bar_height = settings.metrics.bar_height;

    let domain_max = horizontal_domain_max(records, config.fallback_domain_max);
    let x = LinearScale::new(0.0, domain_max)?.with_range(0.0, plot_width)?;

    for slot in &layout.slots {
        match slot {
            LayoutSlot::Heading { label, center_y } => {
                if label.is_empty() {
                    continue;
                }
                frame.texts.push(
                    TextPrimitive::new(
                        label.clone(),
                        area.x + LABEL_GAP,
                        plot_y + center_y,
                        LABEL_FONT_PX + 1.0,
                        palette.text,
                        TextHAlign::Left,
                    )
                    .bold(),
                );
            }
            LayoutSlot::Bar { record, center_y } => {
                let Some(record) = records.get(*record) else {
                    continue;
                };
                let center_y = plot_y + center_y;
                let top = center_y - bar_height / 2.0;

                for segment in record.segments() {
                    let x0 = x.domain_to_pixel(segment.start);
                    let x1 = if segment.end.is_finite() {
                        x.domain_to_pixel(segment.end)
                    } else {
                        x0
                    };
                    let width = (x1 - x0).abs();
                    let rect = RectPrimitive::new(
                        plot_x + x0.min(x1),
                        top,
                        width,
                        bar_height,
                        palette.element(selection, &segment.id, &segment.kind, Color::PURPLE),
                    );
                    frame.push_selectable_rect(segment.id.clone(), rect);

                    if record.is_stacked() {
                        if let Some(text) =
                            fit_segment_label(segment.value(), width, settings.label_char_width_px)
                        {
                            frame.texts.push(TextPrimitive::new(
                                text,
                                plot_x + (x0 + x1) / 2.0,
                                center_y,
                                SMALL_FONT_PX,
                                Color::WHITE,
                                TextHAlign::Center,
                            ));
                        }
                    }
                }

                frame.texts.push(TextPrimitive::new(
                    format_percent(record.total()),
                    plot_x + x.domain_to_pixel(record.total()) + TOTAL_LABEL_GAP,
                    center_y,
                    LABEL_FONT_PX,
                    palette.text,
                    TextHAlign::Left,
                ));
                if !record.label.is_empty() {
                    frame.texts.push(TextPrimitive::new(
                        record.label.clone(),
                        plot_x - LABEL_GAP,
                        center_y,
                        LABEL_FONT_PX,
                        palette.text,
                        TextHAlign::Right,
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Primary options, secondary options and the optional stacked toggle, left
/// to right in the top margin.
pub(super) fn push_horizontal_controls(
    frame: &mut RenderFrame,
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    area: ChartArea,
    controls: HorizontalControls,
) {
    let y = area.y + (config.horizontal.margins.top - CONTROL_HEIGHT).max(0.0) / 2.0;
    let mut x = area.x;

    for option in PrimarySort::OPTIONS {
        let bounds = (x, y, CONTROL_WIDTH, CONTROL_HEIGHT);
        let event = WidgetEvent::SetPrimarySort(option);
        push_button(frame, palette, event, bounds, option.label(), option == controls.primary);
        x += CONTROL_WIDTH + CONTROL_GAP;
    }
    x += CONTROL_GROUP_GAP - CONTROL_GAP;

    for option in SecondarySort::OPTIONS {
        let bounds = (x, y, CONTROL_WIDTH, CONTROL_HEIGHT);
        let event = WidgetEvent::SetSecondarySort(option);
        push_button(frame, palette, event, bounds, option.label(), option == controls.secondary);
        x += CONTROL_WIDTH + CONTROL_GAP;
    }
    x += CONTROL_GROUP_GAP - CONTROL_GAP;

    if controls.stacked_toggle_visible {
        let bounds = (x, y, CONTROL_WIDTH, CONTROL_HEIGHT);
        let event = WidgetEvent::SetStacked(!controls.stacked);
        push_button(frame, palette, event, bounds, "Stacked", controls.stacked);
    }
}
