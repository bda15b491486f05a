use crate::core::{TABLE_COLUMNS, TableColumn, TableLine, TableSort};
use crate::interaction::WidgetEvent;
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RenderFrame, ResolvedPalette, TextHAlign, TextPrimitive,
};

use super::WidgetConfig;
use super::face_layout::{
    LABEL_FONT_PX, card_frame, face_inset, push_flip_icon, table_card_height,
};

const CELL_PADDING: f64 = 8.0;
const ENTRY_INDENT: f64 = 40.0;

/// Column start offsets as shares of the table width.
fn column_share(column: TableColumn) -> (f64, f64) {
    match column {
        TableColumn::Deliverable => (0.0, 0.55),
        TableColumn::Type => (0.55, 0.25),
        TableColumn::Weight => (0.8, 0.2),
    }
}

/// Front face: header row with sort indicator, one row per group header and
/// entry, and the flip icon.
pub(super) fn build_table_frame(
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    card_width: u32,
    lines: &[TableLine],
    sort: TableSort,
) -> RenderFrame {
    let card_height = table_card_height(config, lines.len());
    let mut frame = card_frame(config, palette, card_width, card_height);
    push_flip_icon(&mut frame, config, palette, WidgetEvent::FlipToChart, "Charts");

    let inset = face_inset(config);
    let left = inset;
    let width = (f64::from(card_width) - 2.0 * inset).max(0.0);
    let row_height = config.table_row_height;
    let top = inset + config.title_height;

    for column in TABLE_COLUMNS {
        let (offset, share) = column_share(column);
        let x = left + offset * width;
        let cell = RectPrimitive::new(x, top, share * width, row_height, palette.heading_fill);
        let caption = match sort.indicator(column) {
            Some(indicator) => format!("{} {indicator}", column.label()),
            None => column.label().to_owned(),
        };
        let (text_x, align) = cell_anchor(column, x, share * width);
        let text = TextPrimitive::new(
            caption,
            text_x,
            top + row_height / 2.0,
            LABEL_FONT_PX,
            palette.text,
            align,
        )
        .bold();
        frame.push_control(WidgetEvent::SortTable(column), cell, text);
    }
    frame.lines.push(LinePrimitive::new(
        left,
        top + row_height,
        left + width,
        top + row_height,
        1.0,
        palette.text,
    ));

    for (index, line) in lines.iter().enumerate() {
        let row_top = top + (index + 1) as f64 * row_height;
        let center_y = row_top + row_height / 2.0;
        match line {
            TableLine::GroupHeader { component } => {
                frame.rects.push(RectPrimitive::new(
                    left,
                    row_top,
                    width,
                    row_height,
                    palette.heading_fill,
                ));
                if !component.is_empty() {
                    frame.texts.push(
                        TextPrimitive::new(
                            component.clone(),
                            left + CELL_PADDING,
                            center_y,
                            LABEL_FONT_PX,
                            palette.text,
                            TextHAlign::Left,
                        )
                        .bold(),
                    );
                }
            }
            TableLine::Entry {
                deliverable,
                kind,
                weight_label,
                ..
            } => {
                for (column, value) in [
                    (TableColumn::Deliverable, deliverable.as_str()),
                    (TableColumn::Type, kind.as_str()),
                    (TableColumn::Weight, weight_label.as_str()),
                ] {
                    if value.is_empty() {
                        continue;
                    }
                    let (offset, share) = column_share(column);
                    let (mut text_x, align) =
                        cell_anchor(column, left + offset * width, share * width);
                    if column == TableColumn::Deliverable {
                        text_x += ENTRY_INDENT - CELL_PADDING;
                    }
                    frame.texts.push(TextPrimitive::new(
                        value,
                        text_x,
                        center_y,
                        LABEL_FONT_PX,
                        palette.text,
                        align,
                    ));
                }
            }
        }
    }

    frame
}

fn cell_anchor(column: TableColumn, x: f64, width: f64) -> (f64, TextHAlign) {
    if column.is_right_aligned() {
        (x + width - CELL_PADDING, TextHAlign::Right)
    } else {
        (x + CELL_PADDING, TextHAlign::Left)
    }
}

/// Front face showing a single centered message, used for load failures.
pub(super) fn build_message_frame(
    config: &WidgetConfig,
    palette: &ResolvedPalette,
    card_width: u32,
    message: &str,
) -> RenderFrame {
    let mut frame = card_frame(config, palette, card_width, config.default_card_height);
    if !message.is_empty() {
        frame.texts.push(TextPrimitive::new(
            message,
            f64::from(card_width) / 2.0,
            face_inset(config) + config.title_height + config.table_row_height,
            LABEL_FONT_PX,
            Color::RED,
            TextHAlign::Center,
        ));
    }
    frame
}
