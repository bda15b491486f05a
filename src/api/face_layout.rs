use crate::core::Viewport;
use crate::interaction::{ArrowVisibility, WidgetEvent};
use crate::render::{
    Color, RectPrimitive, RenderFrame, ResolvedPalette, TextHAlign, TextPrimitive,
};

use super::WidgetConfig;

pub(super) const TITLE_FONT_PX: f64 = 20.0;
pub(super) const SUBTITLE_FONT_PX: f64 = 16.0;
pub(super) const LABEL_FONT_PX: f64 = 13.0;
pub(super) const SMALL_FONT_PX: f64 = 11.0;

const FLIP_ICON_WIDTH: f64 = 64.0;
const FLIP_ICON_HEIGHT: f64 = 24.0;
const ARROW_WIDTH: f64 = 28.0;
const ARROW_HEIGHT: f64 = 40.0;

/// Plot container of a chart face, in card pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartArea {
    /// Container below the title and subtitle rows of a card of the given size.
    #[must_use]
    pub fn for_card(config: &WidgetConfig, card_width: u32, card_height: f64) -> Self {
        let card_width = f64::from(card_width);
        let width = (card_width * config.chart_width_ratio).max(0.0);
        Self {
            x: (card_width - width) / 2.0,
            y: face_inset(config) + config.title_height + config.subtitle_height,
            width,
            height: (card_height
                - config.face_padding
                - config.title_height
                - config.subtitle_height)
                .max(0.0),
        }
    }
}

#[must_use]
pub(super) fn face_inset(config: &WidgetConfig) -> f64 {
    config.face_padding / 2.0
}

/// Card height needed to show `line_count` table lines plus the header row.
#[must_use]
pub fn table_card_height(config: &WidgetConfig, line_count: usize) -> f64 {
    let content = (line_count + 1) as f64 * config.table_row_height;
    (content + config.face_padding + config.title_height + config.table_extra_height)
        .max(config.default_card_height)
}

/// Card height needed by a horizontal chart whose bars take `content_height`.
#[must_use]
pub fn horizontal_card_height(config: &WidgetConfig, content_height: f64) -> f64 {
    let margins = config.horizontal.margins;
    let svg_height = content_height + margins.top + margins.bottom;
    (svg_height + config.face_padding + config.title_height + config.subtitle_height)
        .max(config.default_card_height)
}

/// Empty frame sized to the card with the title row drawn.
pub(super) fn card_frame(
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    card_width: u32,
    card_height: f64,
) -> RenderFrame {
    let viewport = Viewport::new(card_width, card_height.ceil() as u32);
    let mut frame = RenderFrame::new(viewport);
    if !config.title.is_empty() {
        frame.texts.push(
            TextPrimitive::new(
                config.title.clone(),
                f64::from(card_width) / 2.0,
                face_inset(config) + config.title_height / 2.0,
                TITLE_FONT_PX,
                palette.text,
                TextHAlign::Center,
            )
            .bold(),
        );
    }
    frame
}

pub(super) fn push_subtitle(
    frame: &mut RenderFrame,
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    subtitle: &str,
) {
    frame.texts.push(
        TextPrimitive::new(
            subtitle,
            f64::from(frame.viewport.width) / 2.0,
            face_inset(config) + config.title_height + config.subtitle_height / 2.0,
            SUBTITLE_FONT_PX,
            palette.text,
            TextHAlign::Center,
        )
        .bold(),
    );
}

/// Flip icon in the top right corner of a face.
pub(super) fn push_flip_icon(
    frame: &mut RenderFrame,
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    event: WidgetEvent,
    caption: &str,
) {
    let inset = face_inset(config);
    let x = f64::from(frame.viewport.width) - inset - FLIP_ICON_WIDTH;
    let y = inset + (config.title_height - FLIP_ICON_HEIGHT) / 2.0;
    push_button(
        frame,
        palette,
        event,
        (x, y, FLIP_ICON_WIDTH, FLIP_ICON_HEIGHT),
        caption,
        false,
    );
}

/// Navigation arrows in the gutters beside the chart area.
pub(super) fn push_arrows(
    frame: &mut RenderFrame,
    palette: &ResolvedPalette,
    area: ChartArea,
    arrows: ArrowVisibility,
) {
    let gutter = area.x;
    let y = area.y + (area.height - ARROW_HEIGHT).max(0.0) / 2.0;
    if arrows.left {
        let x = ((gutter - ARROW_WIDTH) / 2.0).max(0.0);
        let bounds = (x, y, ARROW_WIDTH, ARROW_HEIGHT);
        push_button(frame, palette, WidgetEvent::ArrowLeft, bounds, "<", false);
    }
    if arrows.right {
        let x = area.x + area.width + ((gutter - ARROW_WIDTH) / 2.0).max(0.0);
        let bounds = (x, y, ARROW_WIDTH, ARROW_HEIGHT);
        push_button(frame, palette, WidgetEvent::ArrowRight, bounds, ">", false);
    }
}

/// Clickable rectangle with a centered caption. `bounds` is
/// `(x, y, width, height)`; active buttons use the individual color.
pub(super) fn push_button(
    frame: &mut RenderFrame,
    palette: &ResolvedPalette,
    event: WidgetEvent,
    bounds: (f64, f64, f64, f64),
    caption: &str,
    active: bool,
) {
    let (x, y, width, height) = bounds;
    let (fill, ink) = if active {
        (palette.individual, Color::WHITE)
    } else {
        (palette.heading_fill, palette.text)
    };
    let rect = RectPrimitive::new(x, y, width, height, fill).with_corner_radius(4.0);
    let caption = TextPrimitive::new(
        caption,
        x + width / 2.0,
        y + height / 2.0,
        SMALL_FONT_PX + 1.0,
        ink,
        TextHAlign::Center,
    );
    frame.push_control(event, rect, caption);
}

#[cfg(test)]
mod tests {
    use super::{ChartArea, horizontal_card_height, table_card_height};
    use crate::api::WidgetConfig;

    #[test]
    fn chart_area_uses_width_ratio_and_face_rows() {
        let config = WidgetConfig::default();
        let area = ChartArea::for_card(&config, 1000, 600.0);
        assert_eq!(area.width, 800.0);
        assert_eq!(area.x, 100.0);
        assert_eq!(area.y, 24.0 + 40.0 + 40.0);
        assert_eq!(area.height, 600.0 - 48.0 - 80.0);
    }

    #[test]
    fn card_heights_never_shrink_below_default() {
        let config = WidgetConfig::default();
        assert_eq!(table_card_height(&config, 3), 600.0);
        // 20 lines + header: 21 * 33 + 48 + 40 + 20.
        assert_eq!(table_card_height(&config, 20), 801.0);
        assert_eq!(horizontal_card_height(&config, 100.0), 600.0);
        // 600 + 60 + 128.
        assert_eq!(horizontal_card_height(&config, 600.0), 788.0);
    }
}
