use indexmap::IndexSet;

use crate::core::{
    BandScale, ComponentStack, DeliverableType, LinearScale, component_segment_id, format_percent,
};
use crate::core::ordering::max_weight;
use crate::error::CardResult;
use crate::render::{Color, RectPrimitive, RenderFrame, ResolvedPalette, TextHAlign, TextPrimitive};

use super::WidgetConfig;
use super::face_layout::{ChartArea, LABEL_FONT_PX, SMALL_FONT_PX};

const LABEL_GAP: f64 = 10.0;

/// Horizontal stacked bars, one band per component, individual segment first.
pub(super) fn push_component_stacks(
    frame: &mut RenderFrame,
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    area: ChartArea,
    stacks: &[ComponentStack],
    selection: &IndexSet<String>,
) -> CardResult<()> {
    let settings = config.stacked;
    let longest = stacks
        .iter()
        .map(|stack| stack.component.chars().count())
        .max()
        .unwrap_or(0);
    let left = settings.left_margin(longest);
    let plot_x = area.x + left;
    let plot_y = area.y + settings.margin;
    let plot_width = (area.width - left - settings.margin).max(0.0);
    let plot_height = (area.height - 2.0 * settings.margin).max(0.0);

    let bands = BandScale::new(stacks.len(), 0.0, plot_height, settings.band_padding)?;
    let domain_max = match max_weight(stacks.iter().map(|stack| stack.total)) {
        Some(max) if max != 0.0 => max,
        _ => config.fallback_domain_max,
    };
    let x = LinearScale::new(0.0, domain_max)?.with_range(0.0, plot_width)?;

    for (index, stack) in stacks.iter().enumerate() {
        let Some(band_start) = bands.band_start(index) else {
            continue;
        };
        let top = plot_y + band_start;
        let center_y = top + bands.bandwidth() / 2.0;

        let mut start = 0.0;
        for kind in [DeliverableType::Individual, DeliverableType::Team] {
            let value = stack.value_for(&kind);
            let end = start + value;
            let x0 = x.domain_to_pixel(start);
            // A NaN weight collapses its segment in place.
            let x1 = if end.is_finite() { x.domain_to_pixel(end) } else { x0 };
            let id = component_segment_id(&stack.component, &kind);
            let rect = RectPrimitive::new(
                plot_x + x0.min(x1),
                top,
                (x1 - x0).abs(),
                bands.bandwidth(),
                palette.element(selection, &id, &kind, Color::RED),
            );
            frame.push_selectable_rect(id, rect);

            if value > settings.min_labeled_value {
                frame.texts.push(TextPrimitive::new(
                    format_percent(value),
                    plot_x + (x0 + x1) / 2.0,
                    center_y,
                    SMALL_FONT_PX,
                    Color::WHITE,
                    TextHAlign::Center,
                ));
            }
            start = end;
        }

        if !stack.component.is_empty() {
            frame.texts.push(TextPrimitive::new(
                stack.component.clone(),
                plot_x - LABEL_GAP,
                center_y,
                LABEL_FONT_PX,
                palette.text,
                TextHAlign::Right,
            ));
        }
    }

    Ok(())
}
