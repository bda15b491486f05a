use std::f64::consts::TAU;

use indexmap::IndexSet;

use crate::core::{DonutBucket, DonutCenter, format_percent};
use crate::render::{ArcPrimitive, RenderFrame, ResolvedPalette, TextHAlign, TextPrimitive};

use super::WidgetConfig;
use super::face_layout::{ChartArea, LABEL_FONT_PX};

const CENTER_VALUE_FONT_PX: f64 = 32.0;

/// Start and end angle of each bucket, clockwise from twelve o'clock, in
/// bucket order. Non-positive and `NaN` values get an empty slice.
#[must_use]
pub fn pie_angles(buckets: &[DonutBucket]) -> Vec<(f64, f64)> {
    let span_of = |value: f64| if value > 0.0 { value } else { 0.0 };
    let total: f64 = buckets.iter().map(|bucket| span_of(bucket.value)).sum();
    let scale = if total > 0.0 { TAU / total } else { 0.0 };

    let mut start = 0.0;
    buckets
        .iter()
        .map(|bucket| {
            let end = start + span_of(bucket.value) * scale;
            let angles = (start, end);
            start = end;
            angles
        })
        .collect()
}

/// Text of the donut center description.
#[must_use]
pub fn donut_center_caption(center: DonutCenter) -> &'static str {
    if center.showing_selection {
        "Selected weight in course"
    } else {
        "Individual weight in course"
    }
}

pub(super) fn push_donut(
    frame: &mut RenderFrame,
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    area: ChartArea,
    buckets: &[DonutBucket],
    center: DonutCenter,
    selection: &IndexSet<String>,
) {
    let center_x = area.x + area.width / 2.0;
    let center_y = area.y + area.height / 2.0;
    let radius = area.width.min(area.height) / 2.0 * config.donut.radius_ratio;

    for (bucket, (start_angle, end_angle)) in buckets.iter().zip(pie_angles(buckets)) {
        let id = bucket.element_id();
        let arc = ArcPrimitive {
            center_x,
            center_y,
            inner_radius: radius * config.donut.inner_ratio,
            outer_radius: radius * config.donut.outer_ratio,
            start_angle,
            end_angle,
            fill_color: palette.element(selection, id, &bucket.kind, palette.individual),
        };
        frame.push_selectable_arc(id, arc);
    }

    let ink = if center.showing_selection {
        palette.selected
    } else {
        palette.individual
    };
    frame.texts.push(
        TextPrimitive::new(
            format_percent(center.fraction),
            center_x,
            center_y - 10.0,
            CENTER_VALUE_FONT_PX,
            ink,
            TextHAlign::Center,
        )
        .bold(),
    );
    frame.texts.push(TextPrimitive::new(
        donut_center_caption(center),
        center_x,
        center_y + 30.0,
        LABEL_FONT_PX,
        ink,
        TextHAlign::Center,
    ));
}

#[cfg(test)]
mod tests {
    use super::pie_angles;
    use crate::core::{DeliverableType, DonutBucket};
    use approx::assert_relative_eq;
    use std::f64::consts::{PI, TAU};

    fn buckets(individual: f64, team: f64) -> [DonutBucket; 2] {
        [
            DonutBucket {
                kind: DeliverableType::Individual,
                value: individual,
            },
            DonutBucket {
                kind: DeliverableType::Team,
                value: team,
            },
        ]
    }

    #[test]
    fn angles_are_proportional_and_contiguous() {
        let angles = pie_angles(&buckets(0.75, 0.25));
        assert_relative_eq!(angles[0].0, 0.0);
        assert_relative_eq!(angles[0].1, 1.5 * PI);
        assert_relative_eq!(angles[1].0, 1.5 * PI);
        assert_relative_eq!(angles[1].1, TAU);
    }

    #[test]
    fn empty_and_nan_buckets_collapse() {
        let angles = pie_angles(&buckets(f64::NAN, 0.4));
        assert_relative_eq!(angles[0].1, 0.0);
        assert_relative_eq!(angles[1].1, TAU);

        let angles = pie_angles(&buckets(0.0, 0.0));
        assert!(angles.iter().all(|(start, end)| *start == 0.0 && *end == 0.0));
    }
}
